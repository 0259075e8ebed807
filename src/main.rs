use std::path::{Path, PathBuf};
use std::{fs, process};

use anyhow::{Context, Result, bail};
use log::info;

use photo_walk::{
    assets::PhotoAssets,
    config::GalleryConfig,
    engine::{Session, catalog::Catalog, locomotion::default_party},
    logging,
    player::Player,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "photo-walk play [--catalog <catalog.json>] [--log <file>]";
const CATALOG_USAGE: &str = "photo-walk catalog <output.json>";
const CHECK_USAGE: &str = "photo-walk check <catalog.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let mut catalog_path = None;
            let mut log_path = None;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--catalog" => {
                        catalog_path = Some(PathBuf::from(args.next().context(PLAY_USAGE)?));
                    }
                    "--log" => {
                        log_path = Some(PathBuf::from(args.next().context(PLAY_USAGE)?));
                    }
                    other => bail!("Unknown option {other}\n\nUsage:\n  {PLAY_USAGE}"),
                }
            }
            play(catalog_path.as_deref(), log_path)
        }
        Some("catalog") => {
            let output_path = args.next().context(CATALOG_USAGE)?;
            logging::init(None)?;
            write_catalog(&output_path)
        }
        Some("check") => {
            let path = args.next().context(CHECK_USAGE)?;
            logging::init(None)?;
            check(Path::new(&path))
        }
        _ => bail!(
            "Photo Walk — a stroll past captioned photographs\n\nUsage:\n  {PLAY_USAGE}\n  {CATALOG_USAGE}\n  {CHECK_USAGE}"
        ),
    }
}

fn play(catalog_path: Option<&Path>, log_path: Option<PathBuf>) -> Result<()> {
    let log_path = log_path.unwrap_or_else(|| GalleryConfig::config_dir().join("photo-walk.log"));
    logging::init(Some(&log_path))?;

    let config = GalleryConfig::load();
    let (catalog, base_dir) = match catalog_path {
        Some(path) => {
            let catalog = Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (catalog, base_dir)
        }
        None => (Catalog::builtin(), PathBuf::from(".")),
    };

    let assets = PhotoAssets::load(&catalog, &base_dir);
    info!("{}/{} photos loaded", assets.loaded(), catalog.len());

    let session = Session::new(catalog, config.tuning.clone(), default_party());
    let mut player = Player::new(session, config, assets);
    player.play()
}

fn write_catalog(output_path: &str) -> Result<()> {
    let catalog = Catalog::builtin();
    let json = serde_json::to_string_pretty(&catalog.to_file_data())?;
    fs::write(output_path, &json).with_context(|| format!("Failed to write {output_path}"))?;

    eprintln!("Wrote {} photos -> {}", catalog.len(), output_path);
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;

    eprintln!(
        "{}: {} photos, world width {}",
        path.display(),
        catalog.len(),
        catalog.world_width(),
    );
    Ok(())
}
