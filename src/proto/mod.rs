//! Protocol buffer definitions for the Ledger and Auditor gRPC API

#![allow(clippy::all)]
#![allow(unused_imports)]

// Generated by build.rs from proto/scalar.proto (package `rpc`)
tonic::include_proto!("rpc");
