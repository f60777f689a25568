use std::io;
use std::path::Path;
use colored::*;
use inquire::Select;
use uuid::Uuid;

use crate::models::{GeneratorParams, TestCase};
use crate::utils::{export_file_name, save_matrix_csv, save_to_markdown};

/// Qué exportar sin preguntar
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportChoice {
    pub csv: bool,
    pub markdown: bool,
}

/// Exporta la matriz. En modo interactivo pregunta por cada formato.
pub fn export_matrix(
    out_dir: &Path,
    params: &GeneratorParams,
    audit_id: Option<Uuid>,
    test_cases: &[TestCase],
    choice: ExportChoice,
    interactive: bool,
) -> io::Result<()> {
    // Sin escenarios no hay nada que exportar
    if test_cases.is_empty() {
        return Ok(());
    }

    let want_csv = choice.csv || (interactive && confirm("¿Deseas exportar la matriz a CSV?"));
    if want_csv {
        if let Some(path) = save_matrix_csv(out_dir, &params.feature_name, test_cases)? {
            println!(
                "{}",
                format!("Matriz exportada en {}", path.display()).green()
            );
        }
    }

    let want_markdown =
        choice.markdown || (interactive && confirm("¿Deseas generar también un informe Markdown?"));
    if want_markdown {
        if !out_dir.exists() {
            std::fs::create_dir_all(out_dir)?;
        }
        let md_path = out_dir
            .join(export_file_name(&params.feature_name))
            .with_extension("md");
        save_to_markdown(
            &md_path,
            test_cases,
            &params.feature_name,
            params.platform.as_str(),
            audit_id,
        )?;
        println!(
            "{}",
            format!("Informe guardado en {}", md_path.display()).green()
        );
    }

    Ok(())
}

fn confirm(question: &str) -> bool {
    let options = vec!["Sí", "No"];
    matches!(Select::new(question, options).prompt(), Ok("Sí"))
}
