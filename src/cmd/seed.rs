use super::{load_config, output};
use crate::config::ProjectLayout;
use crate::generator::GeneratorRegistry;
use crate::ordering::PrefixAllocator;
use crate::process::SystemRunner;
use crate::seeder::{SeedOptions, Seeder};

pub fn run(
    layout: &ProjectLayout,
    database: Option<String>,
    dry_run: bool,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(layout)?;
    let runner = SystemRunner::new();
    let registry = GeneratorRegistry::with_builtins();
    let allocator = PrefixAllocator::new();
    let options = SeedOptions {
        force,
        dry_run,
        database,
    };

    let report = Seeder::new(&config, layout, &runner, &registry, &allocator, options).run()?;
    output::print_report("seed", &report, layout, dry_run, json)
}
