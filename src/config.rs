use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "zone-edit",
    version,
    about = "Draw and grid excavation zones over a site plan image"
)]
pub struct Cli {
    /// Reference image (site plan, orthophoto). Can also be opened from the toolbar.
    pub image: Option<PathBuf>,

    /// Excavation site id; each site keeps its own zone set
    #[arg(long, default_value = "default")]
    pub site: String,

    /// Directory holding saved zones [default: <user data dir>/zone-edit]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Quiet period before edits are written to disk
    #[arg(long, default_value_t = 200)]
    pub save_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub image: Option<PathBuf>,
    pub site: String,
    pub data_dir: PathBuf,
    pub save_delay: Duration,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
        Self {
            image: cli.image,
            site: cli.site,
            data_dir,
            save_delay: Duration::from_millis(cli.save_delay_ms),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("zone-edit"))
        .unwrap_or_else(|| PathBuf::from(".zone-edit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["zone-edit"]).unwrap();
        let settings = Settings::from_cli(cli);
        assert_eq!(settings.site, "default");
        assert_eq!(settings.save_delay, Duration::from_millis(200));
        assert!(settings.image.is_none());
        assert!(settings.data_dir.ends_with("zone-edit") || settings.data_dir.ends_with(".zone-edit"));
    }

    #[test]
    fn explicit_arguments() {
        let cli = Cli::try_parse_from([
            "zone-edit",
            "plan.png",
            "--site",
            "trench-4",
            "--data-dir",
            "/tmp/zones",
            "--save-delay-ms",
            "120",
        ])
        .unwrap();
        let settings = Settings::from_cli(cli);
        assert_eq!(settings.image, Some(PathBuf::from("plan.png")));
        assert_eq!(settings.site, "trench-4");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/zones"));
        assert_eq!(settings.save_delay, Duration::from_millis(120));
    }
}
