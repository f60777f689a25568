use std::io;
use std::path::PathBuf;
use colored::*;
use tracing::error;

use crate::commands::export::{export_matrix, ExportChoice};
use crate::commands::form::{check_params, collect_params, FormInput};
use crate::config::GeminiConfig;
use crate::session::{cancel_pair, AuditSession};
use crate::utils::{print_matrix, GeminiClient};

/// Opciones del subcomando `audit`
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub form: FormInput,
    pub model: Option<String>,
    pub export: ExportChoice,
    pub out_dir: PathBuf,
}

/// Ejecuta una auditoría completa: formulario, llamada al modelo, tabla y exportación
pub async fn run_audit(options: AuditOptions) -> io::Result<()> {
    let interactive = options.form.is_interactive();

    let params = match collect_params(options.form) {
        Some(params) => params,
        None => {
            println!("{}", "Operación cancelada.".yellow());
            return Ok(());
        }
    };

    // Sin nombre de funcionalidad no se llega a tocar la red
    if !check_params(&params) {
        return Ok(());
    }

    let mut config = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", format!("ADVERTENCIA: {}", e).yellow());
            println!("{}", "Para auditar, configura la variable de entorno API_KEY.".yellow());
            println!("{}", "Ejemplo: export API_KEY=tu-clave-api".yellow());
            return Ok(());
        }
    };
    if let Some(model) = options.model {
        config.model = model;
    }

    let client = match GeminiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("no se pudo crear el cliente HTTP: {}", e);
            println!("{}", "No se pudo inicializar el cliente del modelo.".red());
            return Ok(());
        }
    };

    let mut session = AuditSession::new(client);

    // Ctrl-C cancela la invocación en curso
    let (handle, token) = cancel_pair();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    println!(
        "{}",
        format!(
            "Modelando el sistema para '{}' ({})... Pulsa Ctrl-C para cancelar.",
            params.feature_name, params.platform
        )
        .blue()
    );

    let outcome = session.run(params.clone(), Some(token)).await.map(|s| s.len());
    watcher.abort();

    if let Err(e) = outcome {
        println!("{}", e.user_message().red());
        return Ok(());
    }

    print_matrix(session.scenarios());

    if session.can_export() {
        export_matrix(
            &options.out_dir,
            &params,
            session.audit_id(),
            session.scenarios(),
            options.export,
            interactive,
        )?;
    }

    Ok(())
}
