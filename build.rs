fn main() {
    println!("cargo:rerun-if-changed=components/bindings.h");
    println!("cargo:rerun-if-env-changed=ROVERCAM_CONFIG");

    // The ESP-IDF link environment only exists when cross-compiling for the
    // device; host builds (simulation, tests) skip it.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
