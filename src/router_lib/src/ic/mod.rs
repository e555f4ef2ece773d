pub mod management_canister;

pub use management_canister::ThresholdSigningOracle;
