use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;

use linkpage::controller::RefreshController;
use linkpage::fetch::{DocumentSource, FileDocumentSource, ProfileSource};
use linkpage::{PageConfig, Viewport};

/// Render a link-in-bio page from a user profile document.
#[derive(Parser, Debug)]
#[command(name = "linkpage", version, about)]
struct Cli {
    /// URL or local path of the user document (user.json)
    source: String,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Write the output here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// How long to wait for the profile badge before rendering without it
    #[arg(long, default_value_t = 3000)]
    wait_profile_ms: u64,

    /// Emit only the region fragments instead of a full HTML document
    #[arg(long)]
    fragment: bool,

    /// Page title for the full-document output
    #[arg(long, default_value = "Links")]
    title: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PageConfig {
        viewport: Viewport {
            width: cli.width,
            height: cli.height,
        },
        ..Default::default()
    };

    let is_url = cli.source.starts_with("http://") || cli.source.starts_with("https://");

    #[cfg(feature = "remote")]
    {
        use linkpage::fetch::{HttpDocumentSource, HttpProfileSource};

        let documents: Box<dyn DocumentSource> = if is_url {
            Box::new(HttpDocumentSource::new(&config, &cli.source)?)
        } else {
            Box::new(FileDocumentSource::new(&cli.source))
        };
        let profiles = HttpProfileSource::new(&config)?;
        run(&cli, config, documents, profiles)
    }

    #[cfg(not(feature = "remote"))]
    {
        use linkpage::fetch::NullProfileSource;

        anyhow::ensure!(
            !is_url,
            "built without the `remote` feature; only local files are supported"
        );
        let documents = FileDocumentSource::new(&cli.source);
        run(&cli, config, documents, NullProfileSource)
    }
}

fn run<D, P>(cli: &Cli, config: PageConfig, documents: D, profiles: P) -> anyhow::Result<()>
where
    D: DocumentSource,
    P: ProfileSource + 'static,
{
    let mut controller = RefreshController::new(config, documents, profiles);
    controller
        .load()
        .context("failed to load the user document")?;

    if controller.profile_pending() {
        controller.wait_profile(Duration::from_millis(cli.wait_profile_ms));
    }

    let html = if cli.fragment {
        controller.html()
    } else {
        controller.document_html(&cli.title)
    };

    match &cli.out {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{html}"),
    }
    Ok(())
}
