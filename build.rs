fn main() {
    // Freedesktop notification daemons hand back a handle that can close the popup.
    println!("cargo:rustc-check-cfg=cfg(xdg_notifications)");
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let unix = std::env::var("CARGO_CFG_TARGET_FAMILY")
        .map(|family| family.split(',').any(|f| f == "unix"))
        .unwrap_or(false);
    if unix && !matches!(os.as_str(), "macos" | "ios" | "android") {
        println!("cargo:rustc-cfg=xdg_notifications");
    }

    tauri_build::build()
}
