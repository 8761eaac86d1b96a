use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::tests::keyed_session;
use crate::{
    Ciphertext, CompressionMode, ElementKind, Error, Persist, Plaintext, SchemeKind,
    SerializableArtifact, Session, SlotVector,
};

#[test]
fn string_and_array_forms_agree() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let ct: Ciphertext =
        session.encrypt(&SlotVector::UInt32(vec![4, 5, 6]), Some(ElementKind::UInt32)).unwrap();

    for mode in [CompressionMode::None, CompressionMode::Deflate] {
        let encoded: String = ct.save(mode).unwrap();
        let bytes: Vec<u8> = ct.save_array(mode).unwrap();
        assert_eq!(STANDARD.decode(&encoded).unwrap(), bytes);

        let artifact: SerializableArtifact = SerializableArtifact::from_base64(&encoded).unwrap();
        assert_eq!(artifact.compression(), mode);
        assert_eq!(artifact.size(), bytes.len() as u64);
        assert_eq!(artifact.as_bytes(), &bytes[..]);
        assert_eq!(ct.artifact(mode).unwrap(), artifact);

        let mut reloaded: Ciphertext = Ciphertext::new(session.context());
        reloaded.load_artifact(session.context(), &artifact).unwrap();
        assert_eq!(reloaded.instance(), ct.instance());
    }

    let raw: usize = ct.save_array(CompressionMode::None).unwrap().len();
    let deflated: usize = ct.save_array(CompressionMode::Deflate).unwrap().len();
    assert!(deflated < raw);
}

#[test]
fn plaintexts_round_trip() {
    for scheme in [SchemeKind::Integer, SchemeKind::Approximate] {
        let session: Session = keyed_session(scheme);
        let pt: Plaintext = session.encode(&SlotVector::Int64(vec![-1, 0, 1]), None).unwrap();
        let encoded: String = session.save(&pt).unwrap();
        let mut reloaded: Plaintext = Plaintext::new(session.context());
        session.load(&mut reloaded, &encoded).unwrap();
        assert_eq!(reloaded.instance(), pt.instance());
    }
}

#[test]
fn malformed_artifacts() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let mut ct: Ciphertext = Ciphertext::new(session.context());

    assert!(matches!(ct.load(session.context(), "%%% not base64"), Err(Error::Artifact(_))));
    assert!(matches!(SerializableArtifact::from_base64("@@"), Err(Error::Artifact(_))));
    assert!(matches!(
        ct.load(session.context(), &STANDARD.encode(b"short")),
        Err(Error::Engine(_))
    ));
    assert!(matches!(SerializableArtifact::from_bytes(vec![0u8; 16]), Err(Error::Engine(_))));

    let good: Vec<u8> = session
        .save_array(&session.encrypt(&SlotVector::Int32(vec![1]), None).unwrap())
        .unwrap();
    let mut truncated: Vec<u8> = good.clone();
    truncated.truncate(good.len() - 8);
    assert!(matches!(ct.load_array(session.context(), &truncated), Err(Error::Engine(_))));
    ct.load_array(session.context(), &good).unwrap();
}

#[test]
fn approximate_ciphertexts_do_not_load_into_integer_context() {
    let integer: Session = keyed_session(SchemeKind::Integer);
    let approximate: Session = keyed_session(SchemeKind::Approximate);
    let ct: Ciphertext = approximate.encrypt(&SlotVector::Double(vec![0.25]), None).unwrap();
    let mut target: Ciphertext = Ciphertext::new(integer.context());
    assert!(matches!(
        target.load_array(integer.context(), &ct.save_array(CompressionMode::Deflate).unwrap()),
        Err(Error::Engine(_))
    ));
}
