use std::path::PathBuf;

use crate::parse::source::SourceFile;

/// Wrap switch cases in an exported C function.
///
/// The first line of `cases` lands on line 4 of the result:
///
/// ```text
/// DLL_EXPORT int <name>(unsigned int sprite)
/// {
///     switch (sprite) {
/// <cases>
///     }
///     return 0;
/// }
/// ```
pub fn c_function(name: &str, cases: &str) -> String {
    format!(
        "DLL_EXPORT int {name}(unsigned int sprite)\n{{\n\tswitch (sprite) {{\n{cases}\n\t}}\n\treturn 0;\n}}\n"
    )
}

pub fn source(text: &str) -> SourceFile {
    SourceFile::from_string(PathBuf::from("sprite.c"), text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::function::locate_function;

    #[test]
    fn cases_start_on_line_four() {
        let src = source(&c_function("_f", "case 1: return 2;"));
        let at = src.text().find("case 1").unwrap();
        assert_eq!(src.offset_to_line(at), 4);
    }

    #[test]
    fn wrapped_function_is_locatable() {
        let text = c_function("_is_yadd_sprite", "case 1: return 2;");
        let body = locate_function(&text, "_is_yadd_sprite").unwrap();
        assert!(body.complete);
        assert!(body.text.contains("case 1: return 2;"));
    }
}
