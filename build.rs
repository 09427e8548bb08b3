fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the Ledger/Auditor protobuf definitions. Servers are generated
    // as well so integration tests can stand up in-process fakes.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/scalar.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/scalar.proto");

    Ok(())
}
