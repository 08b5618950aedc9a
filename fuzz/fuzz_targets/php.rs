#![no_main]
use libfuzzer_sys::fuzz_target;
use parsers::parse_php;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(ast) = parse_php(s, "fuzz.php") {
            // parents precede their children in the arena
            for node in &ast.index {
                if let Some(parent) = node.parent {
                    assert!(parent < node.id);
                }
            }
            let _ = ast.to_json();
        }
    }
});
