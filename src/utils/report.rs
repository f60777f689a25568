use colored::*;

use crate::models::{Severity, TestCase};

/// Grupo visual de una categoría devuelta por el modelo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryBucket {
    Security,
    Network,
    Concurrency,
    BusinessLogic,
    DataLimits,
    /// Cualquier categoría que no encaja en las anteriores
    Other,
}

impl CategoryBucket {
    /// Clasifica por subcadena, sin distinguir mayúsculas. Gana la primera regla que coincide.
    pub fn classify(category: &str) -> Self {
        let cat = category.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| cat.contains(n));

        if has(&["security", "input"]) {
            CategoryBucket::Security
        } else if has(&["api", "network"]) {
            CategoryBucket::Network
        } else if has(&["concurrency", "state"]) {
            CategoryBucket::Concurrency
        } else if has(&["business", "logic"]) {
            CategoryBucket::BusinessLogic
        } else if has(&["data", "limit"]) {
            CategoryBucket::DataLimits
        } else {
            CategoryBucket::Other
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CategoryBucket::Security => Color::Red,
            CategoryBucket::Network => Color::Cyan,
            CategoryBucket::Concurrency => Color::Magenta,
            CategoryBucket::BusinessLogic => Color::Green,
            CategoryBucket::DataLimits => Color::Yellow,
            CategoryBucket::Other => Color::White,
        }
    }
}

pub fn severity_style(severity: Severity) -> ColoredString {
    let label = severity.label();
    match severity {
        Severity::Critical => label.red().bold().on_black(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
    }
}

/// Muestra la matriz en la terminal en el orden devuelto por el modelo
pub fn print_matrix(test_cases: &[TestCase]) {
    if test_cases.is_empty() {
        println!("{}", "El modelo no devolvió escenarios.".yellow());
        return;
    }

    println!(
        "{}",
        format!("Matriz de pruebas destructivas ({} escenarios)", test_cases.len())
            .bold()
            .blue()
    );

    for (i, test_case) in test_cases.iter().enumerate() {
        let bucket = CategoryBucket::classify(&test_case.category);

        println!();
        println!(
            "{} {} {}",
            format!("#{}", i + 1).bold(),
            severity_style(test_case.severity),
            format!("[{}]", test_case.category).color(bucket.color()).bold()
        );
        println!("  {} {}", "Escenario:".bold(), test_case.description);
        println!("  {} {}", "Datos / Acción:".bold(), test_case.test_data.cyan());
        println!("  {} {}", "Resultado esperado:".bold(), test_case.expected_result.italic());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_required_categories() {
        assert_eq!(CategoryBucket::classify("🛡️ Security & Input"), CategoryBucket::Security);
        assert_eq!(CategoryBucket::classify("API & Network"), CategoryBucket::Network);
        assert_eq!(CategoryBucket::classify("Concurrency & State"), CategoryBucket::Concurrency);
        assert_eq!(
            CategoryBucket::classify("Business Logic & Edge Cases"),
            CategoryBucket::BusinessLogic
        );
        assert_eq!(CategoryBucket::classify("DATA & LIMITS"), CategoryBucket::DataLimits);
    }

    #[test]
    fn first_matching_rule_wins() {
        // "input" gana sobre "data"
        assert_eq!(CategoryBucket::classify("Data input"), CategoryBucket::Security);
        // "state" está antes que "data"
        assert_eq!(CategoryBucket::classify("Database state"), CategoryBucket::Concurrency);
    }

    #[test]
    fn unknown_categories_fall_back() {
        assert_eq!(CategoryBucket::classify("Localization"), CategoryBucket::Other);
        assert_eq!(CategoryBucket::classify(""), CategoryBucket::Other);
    }
}
