use std::path::Path;

use chamberpak::package::find_packages;
use console::style;

pub fn execute(source: &Path) -> anyhow::Result<()> {
    let packages = find_packages(source)?;
    if packages.is_empty() {
        println!("No packages found in {}", source.display());
        return Ok(());
    }

    println!("Found {} package(s):", packages.len());
    for package in packages.values() {
        println!(
            "  {} {} ({})",
            style(&package.id).bold(),
            package.name,
            package.path.display()
        );
    }
    Ok(())
}
