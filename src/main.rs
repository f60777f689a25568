use clap::{Parser, Subcommand};
use colored::*;
use inquire::Select;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use destructive_matrix::commands::{preview_request, run_audit, AuditOptions, ExportChoice, FormInput};
use destructive_matrix::models::Platform;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generar una matriz de pruebas destructivas
    Audit {
        /// Nombre de la funcionalidad a auditar
        #[arg(short, long)]
        feature: Option<String>,

        /// Nivel de infraestructura
        #[arg(short, long, value_enum)]
        platform: Option<Platform>,

        /// Detalles de arquitectura y flujo
        #[arg(short, long)]
        context: Option<String>,

        /// Modelo de Gemini a usar
        #[arg(short, long, env = "GEMINI_MODEL")]
        model: Option<String>,

        /// Exportar la matriz a CSV sin preguntar
        #[arg(long)]
        export: bool,

        /// Generar también el informe Markdown
        #[arg(long)]
        markdown: bool,

        /// Directorio de salida de los ficheros exportados
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Mostrar la petición que se enviaría al modelo, sin llamarlo
    Preview {
        /// Nombre de la funcionalidad a auditar
        #[arg(short, long)]
        feature: Option<String>,

        /// Nivel de infraestructura
        #[arg(short, long, value_enum)]
        platform: Option<Platform>,

        /// Detalles de arquitectura y flujo
        #[arg(short, long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Audit {
            feature,
            platform,
            context,
            model,
            export,
            markdown,
            out_dir,
        }) => {
            run_audit(AuditOptions {
                form: FormInput { feature, platform, context },
                model,
                export: ExportChoice { csv: export, markdown },
                out_dir,
            })
            .await?
        }
        Some(Commands::Preview { feature, platform, context }) => {
            preview_request(FormInput { feature, platform, context })?
        }
        None => {
            // Menú interactivo si no se proporciona un comando
            let options = vec![
                "Iniciar auditoría",
                "Previsualizar prompt",
                "Salir",
            ];

            let selection = Select::new("¿Qué deseas hacer?", options).prompt();

            match selection {
                Ok("Iniciar auditoría") => {
                    run_audit(AuditOptions {
                        form: FormInput::default(),
                        model: None,
                        export: ExportChoice::default(),
                        out_dir: PathBuf::from("."),
                    })
                    .await?
                }
                Ok("Previsualizar prompt") => preview_request(FormInput::default())?,
                _ => println!("{}", "¡Hasta pronto!".blue()),
            }
        }
    }

    Ok(())
}
