use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use chrono::Local;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::{Severity, TestCase};

pub const CSV_HEADERS: [&str; 5] = [
    "Category",
    "Severity",
    "Description",
    "Test Data / Action",
    "Expected Result",
];

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

pub const EXPORT_PREFIX: &str = "destructive_matrix_v2";

/// Convierte los escenarios en CSV.
///
/// La cabecera va sin comillas; cada campo de datos va entre comillas dobles y las
/// comillas internas se duplican. Las filas se separan con `\n` sin salto final.
/// Escribir en memoria no falla en la práctica, pero el error de `csv` se propaga.
pub fn to_csv(test_cases: &[TestCase]) -> csv::Result<String> {
    let mut out = CSV_HEADERS.join(",").into_bytes();

    if test_cases.is_empty() {
        return Ok(String::from_utf8_lossy(&out).into_owned());
    }

    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for test_case in test_cases {
        writer.write_record([
            test_case.category.as_str(),
            test_case.severity.as_str(),
            test_case.description.as_str(),
            test_case.test_data.as_str(),
            test_case.expected_result.as_str(),
        ])?;
    }

    let mut out = writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;

    // Quitar el terminador de la última fila
    if out.last() == Some(&b'\n') {
        out.pop();
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Nombre sugerido: prefijo fijo + nombre en minúsculas con los espacios como `_`
pub fn export_file_name(feature_name: &str) -> String {
    let slug = feature_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    // Los espacios al principio o al final también cuentan como un tramo
    let leading = if feature_name.starts_with(char::is_whitespace) { "_" } else { "" };
    let trailing = if feature_name.ends_with(char::is_whitespace) && !slug.is_empty() {
        "_"
    } else {
        ""
    };

    format!("{}_{}{}{}.csv", EXPORT_PREFIX, leading, slug, trailing)
}

/// Guarda la matriz en CSV dentro de `dir`. Sin escenarios no hace nada.
pub fn save_matrix_csv(dir: &Path, feature_name: &str, test_cases: &[TestCase]) -> io::Result<Option<PathBuf>> {
    if test_cases.is_empty() {
        return Ok(None);
    }

    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let content = to_csv(test_cases).map_err(io::Error::from)?;
    let path = dir.join(export_file_name(feature_name));

    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    info!(
        path = %path.display(),
        rows = test_cases.len(),
        content_type = CSV_CONTENT_TYPE,
        "matriz exportada"
    );

    Ok(Some(path))
}

/// Guarda la matriz en formato Markdown
pub fn save_to_markdown(
    file_path: &Path,
    test_cases: &[TestCase],
    feature_name: &str,
    platform: &str,
    audit_id: Option<Uuid>,
) -> io::Result<()> {
    let mut file = File::create(file_path)?;

    // Escribir encabezado
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "# Matriz de Pruebas Destructivas: {}", feature_name)?;
    writeln!(file, "\nFecha de auditoría: {}", timestamp)?;
    writeln!(file, "Plataforma: {}", platform)?;
    if let Some(id) = audit_id {
        writeln!(file, "Auditoría: {}", id)?;
    }
    writeln!(file)?;

    // Calcular resumen por severidad
    let counts: Vec<(Severity, usize)> = Severity::ALL
        .iter()
        .map(|s| (*s, test_cases.iter().filter(|tc| tc.severity == *s).count()))
        .collect();

    writeln!(file, "## Resumen Numérico\n")?;
    writeln!(file, "- Total de escenarios: {}", test_cases.len())?;
    for (severity, count) in &counts {
        writeln!(file, "- {}: {}", severity.label(), count)?;
    }
    writeln!(file)?;

    // Gráfico circular con Mermaid, solo secciones con valores mayores que cero
    writeln!(file, "## Resumen Visual\n")?;
    writeln!(file, "```mermaid")?;
    writeln!(file, "pie title Distribución por Severidad")?;
    for (severity, count) in &counts {
        if *count > 0 {
            writeln!(file, "    \"{}\" : {}", severity.as_str(), count)?;
        }
    }
    writeln!(file, "```\n")?;

    // Detalle de cada escenario en el orden devuelto
    writeln!(file, "## Detalle de Escenarios\n")?;
    for (i, test_case) in test_cases.iter().enumerate() {
        writeln!(file, "### {}. {}", i + 1, test_case.description)?;
        writeln!(file, "- **Categoría**: {}", test_case.category)?;
        writeln!(file, "- **Severidad**: {}", test_case.severity.label())?;
        writeln!(file, "- **Datos / Acción**: `{}`", test_case.test_data.replace('`', "'"))?;
        writeln!(file, "- **Resultado esperado**: {}", test_case.expected_result)?;
        writeln!(file)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(category: &str, severity: Severity, description: &str, test_data: &str, expected: &str) -> TestCase {
        TestCase {
            category: category.to_string(),
            severity,
            description: description.to_string(),
            test_data: test_data.to_string(),
            expected_result: expected.to_string(),
        }
    }

    #[test]
    fn empty_matrix_is_only_the_header() {
        assert_eq!(
            to_csv(&[]).unwrap(),
            "Category,Severity,Description,Test Data / Action,Expected Result"
        );
    }

    #[test]
    fn quotes_are_doubled_and_every_field_is_quoted() {
        let csv = to_csv(&[case(
            "Security & Input",
            Severity::Critical,
            "Contains \"quotes\"",
            "a,b",
            "ok",
        )])
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"Security & Input\",\"Critical\",\"Contains \"\"quotes\"\"\",\"a,b\",\"ok\""
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn empty_fields_are_still_quoted() {
        let csv = to_csv(&[case("", Severity::Low, "", "", "")]).unwrap();
        assert!(csv.ends_with("\"\",\"Low\",\"\",\"\",\"\""));
    }

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(
            export_file_name("Distributed Inventory  Lock"),
            "destructive_matrix_v2_distributed_inventory_lock.csv"
        );
        assert_eq!(export_file_name("Login"), "destructive_matrix_v2_login.csv");
        assert_eq!(export_file_name("Pago\tRápido"), "destructive_matrix_v2_pago_rápido.csv");
    }

    #[test]
    fn export_is_declared_as_utf8_csv() {
        assert_eq!(CSV_CONTENT_TYPE, "text/csv;charset=utf-8");
    }

    #[test]
    fn surrounding_whitespace_becomes_underscores() {
        assert_eq!(export_file_name(" Login "), "destructive_matrix_v2__login_.csv");
    }
}
