//! # case-studio
//!
//! A Rust library for previewing custom phone cases.
//!
//! ## Features
//!
//! - **Compositing**: Stack a design, a material masked by the design's dark
//!   regions, a camera cutout and a custom image into one RGBA preview
//! - **Export**: Flatten the preview and write it as a JPEG
//! - **Imports**: Keep user images in a local library for later selection
//!
//! ## Example - Render and Export
//!
//! ```rust,ignore
//! use case_studio::{CaseConfiguration, Design, Material, Session, Settings};
//!
//! let mut session = Session::new(Settings::default());
//! let mut config = CaseConfiguration::default();
//! config.design = Some(Design::Design1);
//! config.material = Some(Material::Leder);
//! session.set_config(config).unwrap();
//! session.export(Some("preview.jpg".as_ref())).unwrap();
//! ```

pub mod assets;
pub mod case;
pub mod catalog;
pub mod compositor;
pub mod error;
pub mod export;
pub mod imports;
pub mod logging;
pub mod session;
pub mod settings;

// Re-export commonly used items
pub use case::CaseConfiguration;
pub use catalog::{Design, Material};
pub use compositor::{Compositor, CompositorOptions};
pub use error::RenderError;
pub use export::{ExportOutcome, export_jpeg};
pub use session::{Session, Status};
pub use settings::{CameraCutoutPolicy, CameraRect, Settings};
