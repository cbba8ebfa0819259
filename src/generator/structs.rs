//! Struct and union declarations.

use std::collections::BTreeSet;

use super::errors::GenerateError;
use super::naming::{derive_structure_type, structure_type_override};
use super::translate::translate;
use crate::core::{Aggregate, Member};

/// Type of the discriminator member.
const STRUCTURE_TYPE: &str = "VkStructureType";

/// Name of the discriminator member.
const DISCRIMINATOR: &str = "sType";

/// `VkStructureType` enumerants declared so far.
#[derive(Debug, Default)]
pub struct StructureTypes {
    known: BTreeSet<String>,
}

impl StructureTypes {
    /// Record a declared enumerant.
    pub fn register(&mut self, name: impl Into<String>) {
        self.known.insert(name.into());
    }

    /// Whether `token` can be used as a structure type.
    ///
    /// Before `VkStructureType` is declared nothing can be checked and every
    /// token is accepted.
    pub fn accepts(&self, token: &str) -> bool {
        self.known.is_empty() || self.known.contains(token)
    }
}

/// State shared by the struct emitter and its caller.
pub struct StructEmitter<'a> {
    /// Forward declarations needed by the open block
    pub opaque: &'a mut BTreeSet<String>,

    /// Declared structure types
    pub structure_types: &'a StructureTypes,

    /// Fail when a derived structure type is not registered
    pub strict: bool,
}

/// A translated member line.
enum Field {
    Plain { ty: String, name: String },
    Discriminator { ty: String, token: String },
    Bitfields(Vec<(String, String, u32)>),
}

impl StructEmitter<'_> {
    /// Emit `struct Name { ... }` or `union Name { ... }`.
    pub fn emit(&mut self, keyword: &str, aggregate: &Aggregate) -> Result<String, GenerateError> {
        let mut fields: Vec<Field> = Vec::with_capacity(aggregate.members.len());

        for member in &aggregate.members {
            if member.ty.is_empty() || member.name.is_empty() {
                return Err(GenerateError::malformed(
                    &aggregate.name,
                    format!("member `{}` has no type or name", member.name),
                ));
            }

            let (ty, name) = translate(&member.ty, &member.name, Some(&mut *self.opaque));

            if let Some(width) = member.bit_width {
                if let Some(Field::Bitfields(run)) = fields.last_mut() {
                    run.push((ty, name, width));
                } else {
                    fields.push(Field::Bitfields(vec![(ty, name, width)]));
                }
                continue;
            }

            if name == DISCRIMINATOR && ty == STRUCTURE_TYPE {
                if let Some(token) = self.discriminator(&aggregate.name, member)? {
                    fields.push(Field::Discriminator { ty, token });
                    continue;
                }
            }

            fields.push(Field::Plain { ty, name });
        }

        let width = fields
            .iter()
            .map(|field| match field {
                Field::Plain { ty, .. } | Field::Discriminator { ty, .. } => ty.len(),
                Field::Bitfields(_) => 0,
            })
            .max()
            .unwrap_or(0);

        let mut out = format!("\n{} {} {{\n", keyword, aggregate.name);
        for field in &fields {
            let line = match field {
                Field::Plain { ty, name } => format!("\t{:<width$}  {};\n", ty, name),
                Field::Discriminator { ty, token } => format!(
                    "\t{:<width$}  {} = {}.{};\n",
                    ty, DISCRIMINATOR, STRUCTURE_TYPE, token
                ),
                Field::Bitfields(run) => {
                    let args: Vec<String> = run
                        .iter()
                        .map(|(ty, name, bits)| format!("{}, \"{}\", {}", ty, name, bits))
                        .collect();
                    format!("\tmixin(bitfields!({}));\n", args.join(", "))
                }
            };
            out.push_str(&line);
        }
        out.push('}');

        Ok(out)
    }

    /// Pick the structure type assigned to an `sType` member.
    fn discriminator(&self, structure: &str, member: &Member) -> Result<Option<String>, GenerateError> {
        if let Some(token) = structure_type_override(structure) {
            return Ok(Some(token.to_string()));
        }

        let derived = derive_structure_type(structure);
        if self.structure_types.accepts(&derived) {
            return Ok(Some(derived));
        }

        let Some(declared) = member
            .values
            .as_deref()
            .and_then(|values| values.split(',').next())
            .map(str::trim)
        else {
            tracing::debug!("`{}` declares no structure type", structure);
            return Ok(None);
        };

        if self.strict {
            return Err(GenerateError::UnregisteredDiscriminator {
                structure: structure.to_string(),
                token: derived,
            });
        }

        if self.structure_types.accepts(declared) {
            tracing::warn!(
                "`{}` derives `{}`, using registry value `{}`",
                structure,
                derived,
                declared
            );
            return Ok(Some(declared.to_string()));
        }

        tracing::warn!(
            "`{}` declares unknown structure type `{}`, emitting sType without a default",
            structure,
            declared
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{application_info, struct_lines};

    fn emit(aggregate: &Aggregate, known: &[&str], strict: bool) -> Result<String, GenerateError> {
        let mut opaque = BTreeSet::new();
        let mut structure_types = StructureTypes::default();
        for name in known {
            structure_types.register(*name);
        }
        StructEmitter {
            opaque: &mut opaque,
            structure_types: &structure_types,
            strict,
        }
        .emit("struct", aggregate)
    }

    #[test]
    fn test_alignment_column_is_max_type_length() {
        let out = emit(&application_info(), &[], false).unwrap();
        let lines = struct_lines(&out);

        // VkStructureType is the longest translated type.
        let width = "VkStructureType".len();
        for line in &lines {
            let body = line.strip_prefix('\t').unwrap();
            assert_eq!(&body[width..width + 2], "  ", "misaligned: {:?}", line);
        }
        assert!(lines
            .iter()
            .any(|line| !line[width..width + 1].trim().is_empty()));
        assert!(out.starts_with("\nstruct VkApplicationInfo {\n"));
        assert!(out.ends_with("\n}"));
    }

    #[test]
    fn test_discriminator_default() {
        let out = emit(&application_info(), &["VK_STRUCTURE_TYPE_APPLICATION_INFO"], false).unwrap();
        assert!(out.contains(
            "\tVkStructureType  sType = VkStructureType.VK_STRUCTURE_TYPE_APPLICATION_INFO;\n"
        ));
    }

    #[test]
    fn test_discriminator_override() {
        let aggregate = Aggregate::new("VkWin32SurfaceCreateInfoKHR")
            .with_member(Member::new("VkStructureType", "sType"))
            .with_member(Member::new("HWND", "hwnd"));
        let out = emit(&aggregate, &["VK_STRUCTURE_TYPE_WIN32_SURFACE_CREATE_INFO_KHR"], true).unwrap();

        assert!(out.contains("sType = VkStructureType.VK_STRUCTURE_TYPE_WIN32_SURFACE_CREATE_INFO_KHR;"));
    }

    #[test]
    fn test_discriminator_falls_back_to_registry_value() {
        let aggregate = Aggregate::new("VkPhysicalDeviceProperties2").with_member(
            Member::new("VkStructureType", "sType")
                .with_values("VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2"),
        );
        let out = emit(&aggregate, &["VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2"], false).unwrap();

        assert!(out.contains("VkStructureType.VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2;"));
    }

    #[test]
    fn test_strict_rejects_derivation_mismatch() {
        let aggregate = Aggregate::new("VkPhysicalDeviceProperties2").with_member(
            Member::new("VkStructureType", "sType")
                .with_values("VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2"),
        );
        let err = emit(&aggregate, &["VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES_2"], true).unwrap_err();

        assert!(matches!(
            err,
            GenerateError::UnregisteredDiscriminator { ref token, .. }
                if token == "VK_STRUCTURE_TYPE_PHYSICAL_DEVICE_PROPERTIES2"
        ));
    }

    #[test]
    fn test_generic_struct_keeps_plain_stype() {
        let aggregate = Aggregate::new("VkBaseInStructure")
            .with_member(Member::new("VkStructureType", "sType"))
            .with_member(Member::new("const struct VkBaseInStructure*", "pNext"));

        let out = emit(&aggregate, &["VK_STRUCTURE_TYPE_APPLICATION_INFO"], true).unwrap();
        assert!(out.contains("\tVkStructureType            sType;\n"));
        assert!(out.contains("\tconst(VkBaseInStructure)*  pNext;\n"));
    }

    #[test]
    fn test_unknown_registry_value_keeps_plain_stype() {
        let aggregate = Aggregate::new("VkMysteryInfo")
            .with_member(Member::new("VkStructureType", "sType").with_values("VK_STRUCTURE_TYPE_MYSTERY"));

        let out = emit(&aggregate, &["VK_STRUCTURE_TYPE_APPLICATION_INFO"], false).unwrap();
        assert!(out.contains("\tVkStructureType  sType;\n"));
    }

    #[test]
    fn test_arrays_and_reserved_names() {
        let aggregate = Aggregate::new("VkTransformMatrixKHR")
            .with_member(Member::new("float", "matrix[3][4]"))
            .with_member(Member::new("VkShaderModule", "module"));
        let out = emit(&aggregate, &[], false).unwrap();

        assert!(out.contains("\tfloat[4][3]     matrix;\n"));
        assert!(out.contains("\tVkShaderModule  _module;\n"));
    }

    #[test]
    fn test_bitfields_are_packed() {
        let aggregate = Aggregate::new("VkAccelerationStructureInstanceKHR")
            .with_member(Member::new("VkTransformMatrixKHR", "transform"))
            .with_member(Member::new("uint32_t", "instanceCustomIndex").with_bit_width(24))
            .with_member(Member::new("uint32_t", "mask").with_bit_width(8))
            .with_member(Member::new("uint64_t", "accelerationStructureReference"));
        let out = emit(&aggregate, &[], false).unwrap();

        assert!(out.contains(
            "\tmixin(bitfields!(uint32_t, \"instanceCustomIndex\", 24, uint32_t, \"mask\", 8));\n"
        ));
        assert!(out.contains("\tVkTransformMatrixKHR  transform;\n"));
        assert!(out.contains("\tuint64_t              accelerationStructureReference;\n"));
    }

    #[test]
    fn test_opaque_members_registered() {
        let aggregate = Aggregate::new("VkWaylandSurfaceCreateInfoKHR")
            .with_member(Member::new("struct wl_display*", "display"))
            .with_member(Member::new("struct wl_surface*", "surface"));
        let mut opaque = BTreeSet::new();
        let structure_types = StructureTypes::default();
        let out = StructEmitter {
            opaque: &mut opaque,
            structure_types: &structure_types,
            strict: false,
        }
        .emit("struct", &aggregate)
        .unwrap();

        assert!(out.contains("\twl_display*  display;\n"));
        assert_eq!(opaque.into_iter().collect::<Vec<_>>(), ["wl_display", "wl_surface"]);
    }

    #[test]
    fn test_emission_is_deterministic() {
        let first = emit(&application_info(), &[], false).unwrap();
        let second = emit(&application_info(), &[], false).unwrap();
        assert_eq!(first, second);
    }
}
