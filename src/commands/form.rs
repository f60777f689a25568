use colored::*;
use inquire::{Select, Text};

use crate::error::AuditError;
use crate::models::{GeneratorParams, Platform};

/// Valores del formulario que llegaron por línea de comandos
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub feature: Option<String>,
    pub platform: Option<Platform>,
    pub context: Option<String>,
}

impl FormInput {
    /// Sin nombre de funcionalidad el formulario se pide de forma interactiva
    pub fn is_interactive(&self) -> bool {
        self.feature.is_none()
    }

    /// La plataforma se pregunta siempre que no venga por línea de comandos
    pub fn asks_platform(&self) -> bool {
        self.platform.is_none()
    }

    /// El contexto es opcional: solo se pregunta en el formulario interactivo
    pub fn asks_context(&self) -> bool {
        self.context.is_none() && self.is_interactive()
    }
}

/// Completa el formulario. Devuelve `None` si el usuario cancela.
pub fn collect_params(input: FormInput) -> Option<GeneratorParams> {
    let asks_platform = input.asks_platform();
    let asks_context = input.asks_context();

    let feature_name = match input.feature {
        Some(feature) => feature,
        None => match Text::new("Funcionalidad objetivo:")
            .with_placeholder("p. ej. Distributed Inventory Lock")
            .prompt()
        {
            Ok(feature) => feature,
            Err(_) => return None,
        },
    };

    let platform = match input.platform {
        Some(platform) if !asks_platform => platform,
        _ => match Select::new("Nivel de infraestructura:", Platform::ALL.to_vec()).prompt() {
            Ok(platform) => platform,
            Err(_) => return None,
        },
    };

    let context = match input.context {
        Some(context) => context,
        None if asks_context => Text::new("Detalles de arquitectura y flujo (opcional):")
            .with_help_message("Microservicios, restricciones de base de datos, roles, dependencias externas...")
            .prompt()
            .unwrap_or_default(),
        None => String::new(),
    };

    Some(GeneratorParams::new(feature_name, platform, context))
}

/// Comprueba los parámetros y avisa al usuario si faltan datos
pub fn check_params(params: &GeneratorParams) -> bool {
    match params.validate() {
        Ok(()) => true,
        Err(e) => {
            println!("{}", AuditError::from(e).user_message().red());
            false
        }
    }
}
