use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use kh_world_tools::graph::MaterialBlueprint;
use kh_world_tools::import::{self, ImportError, ImportOptions};
use kh_world_tools::validation::{ValidationReport, ValidationSeverity};
use kh_world_tools::world::WorldDocument;

#[derive(Serialize)]
struct Assignment<'a> {
    object: &'a str,
    material: &'a str,
}

#[derive(Serialize)]
struct BlueprintDump<'a> {
    world_id: &'a str,
    materials: &'a BTreeMap<String, MaterialBlueprint>,
    assignments: Vec<Assignment<'a>>,
}

fn print_report(report: &ValidationReport) {
    for item in &report.items {
        let prefix = match item.severity {
            ValidationSeverity::Error => "error",
            ValidationSeverity::Warning => "warning",
            ValidationSeverity::Info => "info",
        };
        eprintln!("  {}: [{}] {}", prefix, item.code, item.message);
    }
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  import-cli <manifest> [options]");
    eprintln!();
    eprintln!("The manifest must be named <world>-preSliced-texture-info.txt and sit next");
    eprintln!("to <world>-world.glb (or .gltf) and one PNG per referenced texture.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --material-mode original|unlit|lit|lit-no-vcol   (default original)");
    eprintln!("  --viewport-alpha opaque|clip|hashed|blend        (default blend)");
    eprintln!("  --cutout always|detect|never                     (default always)");
    eprintln!("  --emission <strength>                            (0..2, default 1.0)");
    eprintln!("  --nudge <distance>                               (0..1, default 0.1)");
    eprintln!("  --dump <file.json>   write the material blueprints as JSON");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  import-cli ./export/tt07-preSliced-texture-info.txt");
    eprintln!("  import-cli ./export/tt07-preSliced-texture-info.txt --cutout detect --dump tt07.json");
    std::process::exit(1);
}

fn parse_or_exit<T: std::str::FromStr<Err = String>>(value: &str) -> T {
    match value.parse::<T>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let manifest_path = PathBuf::from(&args[1]);
    let mut options = ImportOptions::default();
    let mut dump_path: Option<PathBuf> = None;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = match args.get(i + 1) {
            Some(v) => v,
            None => {
                eprintln!("{} requires a value", flag);
                std::process::exit(1);
            }
        };
        match flag {
            "--material-mode" => options.material_mode = parse_or_exit(value),
            "--viewport-alpha" => options.viewport_alpha_mode = parse_or_exit(value),
            "--cutout" => options.cutout_mode = parse_or_exit(value),
            "--emission" => match value.parse::<f32>() {
                Ok(v) => options.unlit_emission_strength = v,
                Err(_) => {
                    eprintln!("--emission requires a number, got '{}'", value);
                    std::process::exit(1);
                }
            },
            "--nudge" => match value.parse::<f32>() {
                Ok(v) => options.transparent_nudge = v,
                Err(_) => {
                    eprintln!("--nudge requires a number, got '{}'", value);
                    std::process::exit(1);
                }
            },
            "--dump" => dump_path = Some(PathBuf::from(value)),
            other => {
                eprintln!("Unknown option '{}'", other);
                usage();
            }
        }
        i += 2;
    }

    eprintln!("Importing {} ...", manifest_path.display());

    let (world, result) = match import::import_world(&manifest_path, &options) {
        Ok(ok) => ok,
        Err(ImportError::Validation(report)) => {
            eprintln!(
                "Import cancelled, {} error(s) / {} warning(s):",
                report.error_count, report.warning_count
            );
            print_report(&report);
            std::process::exit(1);
        }
        Err(ImportError::Fatal(e)) => {
            eprintln!("Import failed: {:?}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Import complete!");
    eprintln!("  World: {}", result.world_id);
    eprintln!("  Materials created: {}", result.materials_created.len());
    eprintln!("  Meshes nudged: {}", result.meshes_nudged);
    eprintln!("  Textures loaded: {}", result.textures_loaded);
    eprintln!("  Cutouts: {}", result.cutouts);
    if result.warnings > 0 {
        eprintln!("  Warnings: {}", result.warnings);
    }

    if let Some(path) = dump_path {
        if let Err(e) = write_dump(&world, &path) {
            eprintln!("Failed to write blueprint dump: {:?}", e);
            std::process::exit(1);
        }
        eprintln!("  Blueprints written to {}", path.display());
    }
}

fn write_dump(world: &WorldDocument, path: &std::path::Path) -> anyhow::Result<()> {
    let assignments = world
        .objects
        .iter()
        .filter_map(|o| {
            o.material.as_deref().map(|m| Assignment {
                object: o.name.as_str(),
                material: m,
            })
        })
        .collect();
    let dump = BlueprintDump {
        world_id: &world.world_id,
        materials: &world.materials,
        assignments,
    };
    let json = serde_json::to_string_pretty(&dump)?;
    std::fs::write(path, json)?;
    Ok(())
}
