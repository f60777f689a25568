use std::io;
use colored::*;

use crate::commands::form::{check_params, collect_params, FormInput};
use crate::utils::build_request;

/// Muestra la petición que se enviaría al modelo, sin llamarlo
pub fn preview_request(input: FormInput) -> io::Result<()> {
    let params = match collect_params(input) {
        Some(params) => params,
        None => {
            println!("{}", "Operación cancelada.".yellow());
            return Ok(());
        }
    };

    if !check_params(&params) {
        return Ok(());
    }

    let request = build_request(&params);
    let schema = serde_json::to_string_pretty(&request.output_schema)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    println!("{}", "== Instrucción de sistema ==".bold().blue());
    println!("{}\n", request.system_instruction);
    println!("{}", "== Prompt ==".bold().blue());
    println!("{}\n", request.prompt);
    println!("{}", "== Esquema de salida ==".bold().blue());
    println!("{}", schema);

    Ok(())
}
