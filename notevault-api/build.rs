//! Build script for the NoteVault API
//!
//! Compiles the Protocol Buffer definitions into Rust code using
//! tonic-prost-build, and writes the encoded file descriptor set used by
//! the gRPC reflection service.

use std::{env, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    tonic_prost_build::configure()
        // Generate server code (we're implementing the service)
        .build_server(true)
        // Generate client code (used by notevault-client and the tests)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("note_v1_descriptor.bin"))
        .compile_protos(&["proto/note_v1.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/note_v1.proto");

    Ok(())
}
