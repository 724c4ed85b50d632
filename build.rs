fn main() {
    // The desktop shell needs tauri.conf.json codegen; the headless core
    // builds without it.
    println!("cargo:rerun-if-changed=tauri.conf.json");

    #[cfg(feature = "desktop")]
    tauri_build::build()
}
