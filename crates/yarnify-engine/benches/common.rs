// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_install_text(lines: usize) -> String {
    let base = "Install it with npm install --save-dev jest\nnpm i -g typescript\nnpm install -D\nThen run npm test.\n";
    base.repeat(lines)
}

#[allow(dead_code)]
pub fn generate_install_markdown(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n"));
        content.push_str("Run `npm i react` to get started.\n\n");
        content.push_str("```sh\nnpm install\nnpm i -E lodash@4\n```\n\n");
    }

    content
}
