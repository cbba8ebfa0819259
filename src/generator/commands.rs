//! Command function pointer aliases and dispatch classification.

use std::collections::BTreeSet;

use serde::Serialize;

use super::errors::GenerateError;
use super::translate::{convert_const, translate};
use crate::core::{Command, FuncPointer, Member};

/// First parameter types dispatched through a device.
const DEVICE_HANDLES: [&str; 3] = ["VkDevice", "VkQueue", "VkCommandBuffer"];

/// Command resolving device-level commands, itself resolved through the instance.
pub const DEVICE_PROC_ADDR: &str = "vkGetDeviceProcAddr";

/// Tier through which a command pointer is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Instance,
    Device,
}

/// Determine the level of a command from its first parameter.
pub fn level_of(command: &Command) -> Level {
    let first = command.params.first().map(|p| p.ty.trim());
    match first {
        Some(ty) if DEVICE_HANDLES.contains(&ty) && command.name != DEVICE_PROC_ADDR => Level::Device,
        _ => Level::Instance,
    }
}

/// Run-wide record of command levels.
#[derive(Debug, Default)]
pub struct CommandClassifier {
    instance_level: BTreeSet<String>,
    device_level: BTreeSet<String>,
}

impl CommandClassifier {
    /// Classify a command and record it in exactly one set.
    pub fn classify(&mut self, command: &Command) -> Level {
        let level = level_of(command);
        let name = command.name.clone();
        match level {
            Level::Instance => {
                self.device_level.remove(&name);
                self.instance_level.insert(name);
            }
            Level::Device => {
                self.instance_level.remove(&name);
                self.device_level.insert(name);
            }
        }
        level
    }

    /// Level recorded for a command.
    #[cfg(test)]
    pub fn level(&self, name: &str) -> Option<Level> {
        if self.device_level.contains(name) {
            Some(Level::Device)
        } else if self.instance_level.contains(name) {
            Some(Level::Instance)
        } else {
            None
        }
    }

    /// Commands resolved through the instance.
    pub fn instance_level(&self) -> &BTreeSet<String> {
        &self.instance_level
    }

    /// Commands resolved through a device.
    pub fn device_level(&self) -> &BTreeSet<String> {
        &self.device_level
    }
}

fn parameter_list(owner: &str, params: &[Member], opaque: &mut BTreeSet<String>) -> Result<String, GenerateError> {
    let mut out = Vec::with_capacity(params.len());
    for param in params {
        if param.ty.is_empty() || param.name.is_empty() {
            return Err(GenerateError::malformed(owner, "parameter without type or name"));
        }
        let (ty, name) = translate(&param.ty, &param.name, Some(&mut *opaque));
        out.push(format!("{} {}", ty, name));
    }
    Ok(out.join(", "))
}

/// Emit the `PFN_` alias of a command.
pub fn emit_command(command: &Command, opaque: &mut BTreeSet<String>) -> Result<String, GenerateError> {
    let params = parameter_list(&command.name, &command.params, opaque)?;
    Ok(format!(
        "\talias PFN_{} = {} function({});",
        command.name,
        convert_const(&command.return_type),
        params
    ))
}

/// Emit a function pointer typedef.
pub fn emit_funcpointer(funcpointer: &FuncPointer, opaque: &mut BTreeSet<String>) -> Result<String, GenerateError> {
    let params = parameter_list(&funcpointer.name, &funcpointer.params, opaque)?;
    Ok(format!(
        "alias {} = {} function({});",
        funcpointer.name,
        convert_const(&funcpointer.return_type),
        params
    ))
}
