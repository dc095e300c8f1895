use std::{env, path::Path};

fn main() {
    println!("cargo::rustc-check-cfg=cfg(cuda_accel)");
    println!("cargo:rerun-if-env-changed=CUDA_PATH");
    println!("cargo:rerun-if-env-changed=MONODEPTH_DISABLE_CUDA");

    if env::var_os("MONODEPTH_DISABLE_CUDA").is_some() {
        println!("cargo:warning=CUDA engine disabled by MONODEPTH_DISABLE_CUDA");
        return;
    }

    let target = env::var("TARGET").unwrap_or_default();

    // Jetson boards ship the toolkit under /usr/local/cuda; desktops usually export CUDA_PATH.
    let jetson = target.contains("aarch64-unknown-linux");
    let toolkit = env::var_os("CUDA_PATH").is_some() || Path::new("/usr/local/cuda").exists();

    if !(jetson || toolkit) {
        println!("cargo:warning=Building without the CUDA engine (no CUDA toolkit found)");
        return;
    }

    println!("cargo:rustc-cfg=cuda_accel");
}
