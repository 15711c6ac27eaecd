//! # Web Media Converter Library
//!
//! Questo è il modulo principale della libreria che espone le API pubbliche.
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione, modi di orchestrazione e validazione
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `file_manager`: Discovery e classificazione dei file media
//! - `paths`: Calcolo dei path di output (struttura relativa preservata)
//! - `image_processor`: Conversione immagini in WebP (via cwebp)
//! - `video_processor`: Conversione video in MP4 H.264/AAC (via FFmpeg)
//! - `converter`: Orchestratore sequenziale del processo
//! - `prompt`: Prompt interattivo per il custom mode
//! - `progress`: Progress tracking e statistiche
//! - `report`: Report finale in JSON
//! - `platform`: Gestione cross-platform dei comandi esterni
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use web_media_converter::{Config, MediaConverter};
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config {
//!     output_dir: "/deploy/media".into(),
//!     ..Default::default()
//! };
//! let converter = MediaConverter::new(config)?;
//! converter.run(std::path::Path::new("/media")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod paths;
pub mod platform;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod utils;
pub mod video_processor;

pub use config::{Config, Mode};
pub use converter::MediaConverter;
pub use error::ConvertError;
pub use progress::ConversionStats;
pub use report::ConversionReport;
