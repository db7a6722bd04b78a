use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use vcam_hw::{Command, Status};

#[zbus::proxy(
    interface = "org.freedesktop.Vcam1",
    default_service = "org.freedesktop.Vcam1",
    default_path = "/org/freedesktop/Vcam1"
)]
trait Vcam {
    async fn control(&self, code: u32, input: Vec<u8>) -> zbus::Result<(u32, Vec<u8>)>;
    async fn set_test_pattern(&self, on: bool) -> zbus::Result<()>;
    async fn set_autofocus(&self, on: bool) -> zbus::Result<()>;
    async fn status(&self) -> zbus::Result<String>;
}

#[derive(Parser)]
#[command(name = "vcam", about = "vcam camera sensor control CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Still,
    Draft,
}

#[derive(Clone, Copy, ValueEnum)]
enum Cam {
    First,
    Second,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect sensor variants and run the full init
    Init,
    /// Show or change the field of view
    Fov {
        /// Horizontal FOV in degrees (54, 39 or 28 on OV5640); omit to query
        degrees: Option<i32>,
    },
    /// Mirror the image horizontally
    Mirror { state: Switch },
    /// Flip the image vertically
    Flip { state: Switch },
    /// Switch capture mode
    Mode { mode: Mode },
    /// Show the torch state, or switch it
    Torch { state: Option<Switch> },
    /// Show whether a camera is active, or put one in or out of standby
    Active {
        #[arg(long, value_enum, default_value = "first")]
        cam: Cam,
        state: Option<Switch>,
    },
    /// Colour-bar test pattern
    TestPattern { state: Switch },
    /// Continuous autofocus
    Autofocus { state: Switch },
    /// Trigger a single still capture
    Grab,
    /// Print the sensor model code
    Model,
    /// Power the sensors down
    Suspend,
    /// Power the sensors up and restore the last mode
    Resume,
    /// Send a raw control code with u32 arguments
    Raw { code: u32, args: Vec<u32> },
    /// Show daemon status
    Status,
    /// List the built-in board profiles (does not need the daemon)
    Boards,
}

fn words(args: &[u32]) -> Vec<u8> {
    args.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn first_word(out: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = out
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .context("short reply from vcamd")?;
    Ok(u32::from_le_bytes(bytes))
}

async fn call(proxy: &VcamProxy<'_>, command: Command, args: &[u32]) -> Result<Vec<u8>> {
    let (status, output) = proxy.control(command.code(), words(args)).await?;
    if status != Status::Success.code() {
        bail!("{command:?} failed with status {status}");
    }
    Ok(output)
}

fn print_boards() {
    for b in vcam_hw::list_boards() {
        println!(
            "{:<6} {:<8} {:<9} i2c-{} {:<12} {}",
            b.board.name,
            b.sensor.family.to_string(),
            format!("{:?}", b.sensor.interface).to_lowercase(),
            b.sensor.adapter,
            b.sensor
                .addresses
                .iter()
                .map(|a| format!("{a:#04x}"))
                .collect::<Vec<_>>()
                .join(","),
            b.board.description,
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Commands::Boards = cli.command {
        print_boards();
        return Ok(());
    }

    let conn = zbus::Connection::system()
        .await
        .context("connecting to the system bus")?;
    let proxy = VcamProxy::new(&conn).await?;

    match cli.command {
        Commands::Init => {
            call(&proxy, Command::Init, &[]).await?;
            println!("Camera initialized");
        }
        Commands::Fov { degrees: None } => {
            let out = call(&proxy, Command::GetFov, &[]).await?;
            println!("{}", first_word(&out)? as i32);
        }
        Commands::Fov {
            degrees: Some(degrees),
        } => {
            call(&proxy, Command::SetFov, &[degrees as u32]).await?;
        }
        Commands::Mirror { state } => {
            let cmd = if state.is_on() { Command::MirrorOn } else { Command::MirrorOff };
            call(&proxy, cmd, &[]).await?;
        }
        Commands::Flip { state } => {
            let cmd = if state.is_on() { Command::FlipOn } else { Command::FlipOff };
            call(&proxy, cmd, &[]).await?;
        }
        Commands::Mode { mode } => {
            let code = match mode {
                Mode::Still => 0,
                Mode::Draft => 1,
            };
            call(&proxy, Command::SetCamMode, &[code]).await?;
        }
        Commands::Torch { state: None } => {
            let out = call(&proxy, Command::GetFlash, &[]).await?;
            let torch = out.get(4..).map(first_word).transpose()?.unwrap_or(0);
            println!("torch: {}", if torch != 0 { "on" } else { "off" });
        }
        Commands::Torch { state: Some(state) } => {
            call(&proxy, Command::SetFlash, &[0, u32::from(state.is_on())]).await?;
        }
        Commands::Active { state: None, .. } => {
            let out = call(&proxy, Command::GetActive, &[]).await?;
            println!("active: {}", first_word(&out)? != 0);
        }
        Commands::Active {
            cam,
            state: Some(state),
        } => {
            let cmd = match cam {
                Cam::First => Command::SetActive,
                Cam::Second => Command::SetSecondActive,
            };
            call(&proxy, cmd, &[u32::from(state.is_on())]).await?;
        }
        Commands::TestPattern { state } => proxy.set_test_pattern(state.is_on()).await?,
        Commands::Autofocus { state } => proxy.set_autofocus(state.is_on()).await?,
        Commands::Grab => {
            call(&proxy, Command::GrabStill, &[]).await?;
        }
        Commands::Model => {
            let out = call(&proxy, Command::GetCamModel, &[]).await?;
            println!("{}", first_word(&out)?);
        }
        Commands::Suspend => {
            call(&proxy, Command::Suspend, &[]).await?;
        }
        Commands::Resume => {
            call(&proxy, Command::Resume, &[]).await?;
        }
        Commands::Raw { code, args } => {
            let (status, output) = proxy.control(code, words(&args)).await?;
            println!("status: {status}");
            for chunk in output.chunks(4) {
                println!("  {}", first_word(chunk).unwrap_or_default());
            }
        }
        Commands::Status => {
            let json = proxy.status().await?;
            let value: serde_json::Value = serde_json::from_str(&json)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Boards => print_boards(),
    }

    Ok(())
}
