fn main() {
    println!("cargo:rerun-if-env-changed=LEDCLOCK_CONFIG_JSON");

    // Host builds (tests, fuzzing) have no ESP-IDF environment to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
