use case_studio::catalog::{self, parse_optional};
use case_studio::compositor::Compositor;
use case_studio::imports::ImportLibrary;
use case_studio::logging::init_logging;
use case_studio::settings::Settings;
use case_studio::{CaseConfiguration, Design, Material, export_jpeg};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "case-studio", version, about = "Render phone case previews without the window")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one configuration to a JPEG (or PNG when the output ends in .png)
    Render {
        #[arg(long, default_value = "Apple")]
        manufacturer: String,
        /// Defaults to the manufacturer's first model
        #[arg(long)]
        model: Option<String>,
        /// Design name or "None"
        #[arg(long, default_value = "None", value_parser = parse_optional::<Design>)]
        design: std::option::Option<Design>,
        /// Material name or "None"
        #[arg(long, default_value = "None", value_parser = parse_optional::<Material>)]
        material: std::option::Option<Material>,
        /// Imported image name or path
        #[arg(long)]
        custom: Option<String>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset_x: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset_y: i32,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List manufacturers, models, designs and materials
    Catalog,
    /// Copy an image into the imports library
    Import { file: PathBuf },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(2);
        }
    };

    match cli.command {
        Command::Catalog => print_catalog(),
        Command::Import { file } => {
            let library = ImportLibrary::new(&settings.imports_dir);
            match library.import(&file) {
                Ok(name) => println!("Imported '{}' as '{}'", file.display(), name),
                Err(e) => {
                    eprintln!("Error importing '{}': {}", file.display(), e);
                    process::exit(3);
                }
            }
        }
        Command::Render {
            manufacturer,
            model,
            design,
            material,
            custom,
            offset_x,
            offset_y,
            scale,
            width,
            height,
            output,
        } => {
            let mut config = CaseConfiguration::with_canvas(
                width.unwrap_or(settings.canvas_width),
                height.unwrap_or(settings.canvas_height),
            );
            if !config.set_manufacturer(&manufacturer) {
                eprintln!("Unknown manufacturer: {}", manufacturer);
                process::exit(1);
            }
            if let Some(model) = model
                && !config.set_model(&model)
            {
                eprintln!("Unknown model for {}: {}", manufacturer, model);
                process::exit(1);
            }
            config.design = design;
            config.material = material;
            config.custom_image = custom;
            config.custom_image_position = (offset_x, offset_y);
            config.custom_image_scale = scale;

            let compositor = Compositor::from_settings(&settings);
            let preview = match compositor.render(&config) {
                Ok(img) => img,
                Err(e) => {
                    eprintln!("Error rendering preview: {}", e);
                    process::exit(3);
                }
            };

            let is_png = output
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            let written = if is_png {
                preview
                    .save(&output)
                    .map_err(case_studio::RenderError::Encode)
            } else {
                export_jpeg(&preview, &output, &settings.export)
            };

            match written {
                Ok(()) => println!("Rendered preview to '{}'", output.display()),
                Err(e) => {
                    eprintln!("Error writing output file '{}': {}", output.display(), e);
                    process::exit(4);
                }
            }
        }
    }
}

fn print_catalog() {
    println!("Manufacturers:");
    for manufacturer in catalog::manufacturers() {
        let models = catalog::models_for(manufacturer).unwrap_or_default();
        println!("  {}: {}", manufacturer, models.join(", "));
    }
    let designs: Vec<_> = Design::ALL.iter().map(|d| d.name()).collect();
    let materials: Vec<_> = Material::ALL.iter().map(|m| m.name()).collect();
    println!("Designs: {}, {}", catalog::NONE_LABEL, designs.join(", "));
    println!("Materials: {}, {}", catalog::NONE_LABEL, materials.join(", "));
}
