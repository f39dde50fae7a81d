//! Machine descriptor synthesis.
//!
//! Hyper-V registers an imported machine from `Virtual Machines/vm.xml`.
//! The built-in template is the smallest document that points a
//! generation 1 machine at a single VHD.
//!
//! `creation_time` is left at the template's fixed value; Hyper-V assigns
//! its own on import.

use crate::constants::placeholders;

/// Built-in Hyper-V machine descriptor template.
pub const VM_XML: &str = include_str!("vm.xml");

/// Substitute the machine name and disk path into `template`.
///
/// Each token is replaced once. Values are inserted verbatim: callers must
/// keep them free of the placeholder tokens and of XML markup.
pub fn render_descriptor(template: &str, machine_name: &str, disk_path: &str) -> Vec<u8> {
    template
        .replacen(placeholders::VM_NAME, machine_name, 1)
        .replacen(placeholders::VHD_PATH, disk_path, 1)
        .into_bytes()
}

/// Render the built-in template.
pub fn render_vm_xml(machine_name: &str, disk_path: &str) -> Vec<u8> {
    render_descriptor(VM_XML, machine_name, disk_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_template_has_each_token_once() {
        assert_eq!(VM_XML.matches(placeholders::VM_NAME).count(), 1);
        assert_eq!(VM_XML.matches(placeholders::VHD_PATH).count(), 1);
    }

    #[test]
    fn test_render_substitutes_both_tokens() {
        let rendered = render_vm_xml(
            "packer-demo-1700000000",
            "/out/Virtual Hard Disks/packer-demo-1700000000.vhd",
        );
        let text = String::from_utf8(rendered).unwrap();

        assert!(text.contains(r#"<name type="string">packer-demo-1700000000</name>"#));
        assert!(text.contains(
            r#"<pathname type="string">/out/Virtual Hard Disks/packer-demo-1700000000.vhd</pathname>"#
        ));
        assert!(!text.contains(placeholders::VM_NAME));
        assert!(!text.contains(placeholders::VHD_PATH));
    }

    #[test]
    fn test_render_replaces_only_first_occurrence() {
        let template = "INSERT_VM_NAME_HERE INSERT_VM_NAME_HERE INSERT_VHD_PATH_HERE";
        let rendered = render_descriptor(template, "a", "b");
        assert_eq!(rendered, b"a INSERT_VM_NAME_HERE b");
    }

    #[test]
    fn test_creation_time_left_unresolved() {
        let text = String::from_utf8(render_vm_xml("vm", "/d.vhd")).unwrap();
        assert!(text.contains(r#"<creation_time type="bytes">AAAAAAAAAAA=</creation_time>"#));
    }

    proptest! {
        #[test]
        fn prop_render_is_deterministic(
            name in "[a-zA-Z0-9 _.-]{1,40}",
            path in "/[a-zA-Z0-9 _./-]{1,80}",
        ) {
            let first = render_vm_xml(&name, &path);
            let second = render_vm_xml(&name, &path);
            prop_assert_eq!(&first, &second);

            let text = String::from_utf8(first).unwrap();
            prop_assert!(text.contains(&name));
            prop_assert!(text.contains(&path));
            prop_assert!(!text.contains(placeholders::VM_NAME));
            prop_assert!(!text.contains(placeholders::VHD_PATH));
        }
    }
}
