use crate::engine::{EngineHandle, Feature};
use vcam_hw::{Command, Status};
use zbus::interface;

/// D-Bus interface for the vcam control daemon.
///
/// Bus name: org.freedesktop.Vcam1
/// Object path: /org/freedesktop/Vcam1
pub struct VcamService {
    pub engine: EngineHandle,
}

fn status_result(what: &str, status: Status) -> zbus::fdo::Result<()> {
    match status {
        Status::Success => Ok(()),
        Status::NotSupported => Err(zbus::fdo::Error::NotSupported(what.to_string())),
        Status::InvalidParameter => Err(zbus::fdo::Error::InvalidArgs(what.to_string())),
        Status::BusFailure => Err(zbus::fdo::Error::IOError(format!("{what}: bus failure"))),
    }
}

impl VcamService {
    async fn run(&self, command: Command, input: Vec<u8>) -> zbus::fdo::Result<Vec<u8>> {
        let response = self
            .engine
            .control(command.code(), input)
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        status_result(&format!("{command:?}"), response.status)?;
        Ok(response.output)
    }

    async fn feature(&self, feature: Feature, on: bool) -> zbus::fdo::Result<()> {
        let status = self
            .engine
            .feature(feature, on)
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        status_result(&format!("{feature:?}"), status)
    }
}

#[interface(name = "org.freedesktop.Vcam1")]
impl VcamService {
    /// Raw control request: command code and little-endian payload in,
    /// status code and output payload back.
    async fn control(&self, code: u32, input: Vec<u8>) -> zbus::fdo::Result<(u32, Vec<u8>)> {
        tracing::debug!(code, len = input.len(), "control requested");
        let response = self
            .engine
            .control(code, input)
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        Ok((response.status.code(), response.output))
    }

    /// Select a field of view in degrees.
    async fn set_fov(&self, fov: i32) -> zbus::fdo::Result<()> {
        tracing::info!(fov, "set_fov requested");
        self.run(Command::SetFov, fov.to_le_bytes().to_vec()).await?;
        Ok(())
    }

    /// Current field of view in degrees.
    async fn get_fov(&self) -> zbus::fdo::Result<i32> {
        let out = self.run(Command::GetFov, Vec::new()).await?;
        let bytes: [u8; 4] = out
            .as_slice()
            .try_into()
            .map_err(|_| zbus::fdo::Error::Failed("short GetFov reply".into()))?;
        Ok(i32::from_le_bytes(bytes))
    }

    /// Colour-bar test pattern on the first camera.
    async fn set_test_pattern(&self, on: bool) -> zbus::fdo::Result<()> {
        tracing::info!(on, "set_test_pattern requested");
        self.feature(Feature::TestPattern, on).await
    }

    async fn set_autofocus(&self, on: bool) -> zbus::fdo::Result<()> {
        tracing::info!(on, "set_autofocus requested");
        self.feature(Feature::Autofocus, on).await
    }

    /// Device status as JSON.
    async fn status(&self) -> zbus::fdo::Result<String> {
        let status = self
            .engine
            .status()
            .await
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        let mut json = serde_json::to_value(&status)
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))?;
        json["version"] = env!("CARGO_PKG_VERSION").into();
        Ok(json.to_string())
    }
}
