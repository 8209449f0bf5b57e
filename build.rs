use std::env;

const ENDPOINT_VAR: &str = "EMAILER_API_URL";

fn main() {
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed={}", ENDPOINT_VAR);

    // Load .env so the endpoint can be embedded for release builds
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=BUILD.RS: No .env file loaded ({}). Using system environment variables.", e);
    }

    // Embedded at compile time; runtime environment still takes precedence
    match env::var(ENDPOINT_VAR) {
        Ok(url) if !url.trim().is_empty() => {
            println!("cargo:rustc-env={}={}", ENDPOINT_VAR, url.trim());
        }
        _ => {
            println!("cargo:warning={} not found in environment during build", ENDPOINT_VAR);
        }
    }
}
