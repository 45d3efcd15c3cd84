use std::path::Path;
use std::time::Instant;

use chamberpak::{load_packages, LoadConfig};
use console::style;

use crate::progress::{print_done, BarProgress};

pub fn execute(
    source: &Path,
    cache: &Path,
    images: &Path,
    log_fallbacks: bool,
    log_missing_styles: bool,
    log_missing_ent_count: bool,
) -> anyhow::Result<()> {
    let config = LoadConfig {
        packages_dir: source.to_path_buf(),
        cache_dir: cache.to_path_buf(),
        image_dir: images.to_path_buf(),
        log_item_fallbacks: log_fallbacks,
        log_missing_styles,
        log_missing_ent_count,
    };

    let started = Instant::now();
    let mut progress = BarProgress::new();
    let data = load_packages(&config, &mut progress)?;
    progress.finish();

    println!();
    println!("Loaded {} package(s):", data.packages.len());
    for package in &data.packages {
        println!("  {} {}", style(&package.id).bold(), package.name);
    }
    println!();
    for (label, count) in [
        ("Styles", data.styles.len()),
        ("Items", data.items.len()),
        ("Quote packs", data.quote_packs.len()),
        ("Skyboxes", data.skyboxes.len()),
        ("Music", data.music.len()),
        ("Style vars", data.style_vars.len()),
        ("Elevator videos", data.elevators.len()),
        ("Pack lists", data.pack_lists.len()),
        ("Editor sounds", data.editor_sounds.len()),
    ] {
        println!("  {label:>15}: {count}");
    }
    print_done(started.elapsed());
    Ok(())
}
