#![no_main]

//! Fuzz target for contact payload decoding.
//!
//! Arbitrary bytes go through the same decode and validation steps as a
//! `POST` body. Either step may reject the input but neither may panic.

use intake_api::handlers::ContactSubmission;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(submission) = ContactSubmission::decode(data) else {
        return;
    };

    if let Ok(contact) = submission.validate() {
        assert!(!contact.name.is_empty());
        assert!(!contact.email.is_empty());
        assert!(!contact.message.is_empty());
        assert!(!contact.ip.is_empty());
        assert!(!contact.country.is_empty());
    }
});
