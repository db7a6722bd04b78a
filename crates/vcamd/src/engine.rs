use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use vcam_hw::{BoardFile, ControlDevice, DeviceConfig, DeviceStatus, Response, Status};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("device error: {0}")]
    Device(#[from] vcam_hw::Error),
    #[error("failed to spawn engine thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("engine thread exited")]
    ChannelClosed,
}

/// Messages sent from D-Bus handlers to the engine thread.
enum EngineRequest {
    Control {
        code: u32,
        input: Vec<u8>,
        reply: oneshot::Sender<Response>,
    },
    Status {
        reply: oneshot::Sender<DeviceStatus>,
    },
    Feature {
        feature: Feature,
        on: bool,
        reply: oneshot::Sender<Status>,
    },
}

/// Sensor features without a control code.
#[derive(Debug, Clone, Copy)]
pub enum Feature {
    TestPattern,
    Autofocus,
}

/// Clone-safe handle to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Run one control request on the device.
    pub async fn control(&self, code: u32, input: Vec<u8>) -> Result<Response, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Control {
                code,
                input,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Switch a sensor feature on or off.
    pub async fn feature(&self, feature: Feature, on: bool) -> Result<Status, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Feature {
                feature,
                on,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    pub async fn status(&self) -> Result<DeviceStatus, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Status { reply: reply_tx })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}

/// Spawn the engine on a dedicated OS thread.
///
/// Opens the bus adapter synchronously so a missing device fails startup.
/// Register batches sleep and retry, so requests never run on the async
/// runtime.
pub fn spawn_engine(
    board: BoardFile,
    config: DeviceConfig,
    auto_init: bool,
) -> Result<EngineHandle, EngineError> {
    let device = ControlDevice::open(board, config)?;
    tracing::info!(
        board = %device.board().board.name,
        family = %device.family(),
        adapter = device.board().sensor.adapter,
        "camera device opened"
    );

    let (tx, mut rx) = mpsc::channel::<EngineRequest>(4);

    std::thread::Builder::new()
        .name("vcam-engine".into())
        .spawn(move || {
            tracing::info!("engine thread started");
            if auto_init {
                if let Err(e) = device.init() {
                    tracing::error!(error = %e, "startup init failed; waiting for Init request");
                }
            }
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Control { code, input, reply } => {
                        let _ = reply.send(device.dispatch(code, &input));
                    }
                    EngineRequest::Status { reply } => {
                        let _ = reply.send(device.status());
                    }
                    EngineRequest::Feature { feature, on, reply } => {
                        let result = match feature {
                            Feature::TestPattern => device.set_test_pattern(on),
                            Feature::Autofocus => device.set_autofocus(on),
                        };
                        let status = match result {
                            Ok(()) => Status::Success,
                            Err(e) => {
                                tracing::error!(?feature, on, error = %e, "feature request failed");
                                Status::from(&e)
                            }
                        };
                        let _ = reply.send(status);
                    }
                }
            }
            tracing::info!("engine thread exiting");
        })?;

    Ok(EngineHandle { tx })
}
