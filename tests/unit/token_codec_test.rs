// Property-based tests for the correlation token codec
//
// Round-trip law plus the hard requirement that malformed input fails
// loudly: decode never yields a valid-looking but wrong tuple and never
// panics.

use proptest::prelude::*;

use paybridge::signing::{CorrelationToken, DecodeError};

proptest! {
    #[test]
    fn prop_round_trip(
        payment_id in "[a-zA-Z0-9-]{1,40}",
        fingerprint in "[a-f0-9]{1,64}",
    ) {
        let token = CorrelationToken::new(payment_id, fingerprint);
        let encoded = token.encode().unwrap();
        prop_assert_eq!(CorrelationToken::decode(&encoded).unwrap(), token);
    }

    #[test]
    fn prop_truncation_is_malformed(
        payment_id in "[a-zA-Z0-9-]{1,40}",
        fingerprint in "[a-f0-9]{16,64}",
        cut in 1usize..20,
    ) {
        let encoded = CorrelationToken::new(payment_id, fingerprint)
            .encode()
            .unwrap();
        prop_assume!(cut < encoded.len());
        let truncated = &encoded[..encoded.len() - cut];

        prop_assert!(matches!(
            CorrelationToken::decode(truncated),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn prop_arbitrary_garbage_never_decodes_to_a_wrong_tuple(raw in ".{0,120}") {
        // Either the input is a well-formed token and decodes to exactly its
        // own fields, or decode reports Malformed. No third outcome.
        match CorrelationToken::decode(&raw) {
            Ok(token) => {
                let reencoded = token.encode().unwrap();
                prop_assert_eq!(CorrelationToken::decode(&reencoded).unwrap(), token);
            }
            Err(DecodeError::Malformed(_)) => {}
        }
    }
}

#[test]
fn test_wire_form_is_compact_json() {
    let encoded = CorrelationToken::new("42", "abc").encode().unwrap();
    assert_eq!(
        encoded,
        r#"{"payment_id":"42","secret_fingerprint":"abc"}"#
    );
}

#[test]
fn test_wrong_shape_json_is_malformed() {
    for raw in [
        r#"{"payment_id": 42, "secret_fingerprint": "abc"}"#,
        r#"{"payment_id": null, "secret_fingerprint": "abc"}"#,
        r#"[{"payment_id": "42", "secret_fingerprint": "abc"}]"#,
    ] {
        assert!(
            matches!(
                CorrelationToken::decode(raw),
                Err(DecodeError::Malformed(_))
            ),
            "expected Malformed for {:?}",
            raw
        );
    }
}
