pub mod callback_verifier;

pub use callback_verifier::CallbackVerifier;
