fn main() {
    // The remote page may only reach the page bridge commands.
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(&["report_favicon", "notify"])),
    )
    .expect("failed to run tauri-build");
}
