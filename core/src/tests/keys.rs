use crate::tests::keyed_session;
use crate::{
    CompressionMode, ComputationLevel, ElementKind, Error, GaloisKeys, KeyLifecycle, KeyPair,
    KeyState, Persist, PublicKey, RelinKeys, SchemeKind, SecretKey, Session, SessionConfig,
    SlotVector,
};

#[test]
fn key_state_transitions() {
    let mut session: Session = Session::new(SessionConfig::default()).unwrap();
    assert_eq!(session.key_state(), KeyState::Uninitialized);
    match session.generate_relin_keys() {
        Err(Error::Engine(msg)) => {
            assert_eq!(msg, "secret key is not valid for encryption parameters")
        }
        other => panic!("unexpected {:?}", other.map(|_| ())),
    }
    assert!(matches!(session.generate_galois_keys(None), Err(Error::Engine(_))));
    assert_eq!(session.key_state(), KeyState::Uninitialized);

    session.generate_keys().unwrap();
    assert_eq!(session.key_state(), KeyState::KeysGenerated);
    session.generate_relin_keys().unwrap();
    assert_eq!(session.key_state(), KeyState::RelinKeysGenerated);
    session.generate_galois_keys(Some(&[1, -1])).unwrap();
    assert_eq!(session.key_state(), KeyState::GaloisKeysGenerated);
    session.generate_relin_keys().unwrap();
    assert_eq!(session.key_state(), KeyState::RelinKeysGenerated);
    session.generate_keys().unwrap();
    assert_eq!(session.key_state(), KeyState::KeysGenerated);
}

#[test]
fn key_pairs_are_fresh() {
    let session: Session = Session::new(SessionConfig::default()).unwrap();
    let mut keys: KeyLifecycle = KeyLifecycle::new(session.context()).unwrap();
    let a: KeyPair = keys.generate_keys().unwrap();
    let b: KeyPair = keys.generate_keys().unwrap();
    assert_ne!(a.secret.instance(), b.secret.instance());
    assert_ne!(a.public.instance(), b.public.instance());
}

#[test]
fn empty_secret_key_is_rejected_by_engine() {
    let session: Session = Session::new(SessionConfig::default()).unwrap();
    let mut keys: KeyLifecycle = KeyLifecycle::new(session.context()).unwrap();
    let mut secret: SecretKey = SecretKey::new(session.context());

    match keys.generate_relin_keys(&secret) {
        Err(Error::Engine(msg)) => {
            assert_eq!(msg, "secret key is not valid for encryption parameters")
        }
        other => panic!("unexpected {:?}", other.map(|_| ())),
    }
    assert!(matches!(keys.generate_galois_keys(&secret, None), Err(Error::Engine(_))));
    assert_eq!(keys.state(), KeyState::Uninitialized);

    secret.delete();
    assert!(matches!(keys.generate_relin_keys(&secret), Err(Error::Released("secret key"))));
}

#[test]
fn default_galois_keys() {
    let mut session: Session = keyed_session(SchemeKind::Integer);
    let keys: GaloisKeys = session.generate_galois_keys(None).unwrap();
    // steps 1024 and -1024 share an element at degree 4096
    assert_eq!(keys.require().unwrap().len(), 22);
    assert!(keys.require().unwrap().has_key(2 * 4096 - 1));

    let keys: GaloisKeys = session.generate_galois_keys(Some(&[0, 1, 1])).unwrap();
    assert_eq!(keys.require().unwrap().galois_elts(), vec![3, 8191]);
}

#[test]
fn reloaded_keys_are_interchangeable() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let public: String = session.public_key().unwrap().save(CompressionMode::Deflate).unwrap();
    let secret: Vec<u8> = session.secret_key().unwrap().save_array(CompressionMode::None).unwrap();

    let mut other: Session = Session::new(SessionConfig::default()).unwrap();
    let mut reloaded_public: PublicKey = PublicKey::new(other.context());
    let mut reloaded_secret: SecretKey = SecretKey::new(other.context());
    reloaded_public.load(other.context(), &public).unwrap();
    reloaded_secret.load_array(other.context(), &secret).unwrap();
    assert_eq!(reloaded_public.instance(), session.public_key().unwrap().instance());
    assert_eq!(reloaded_secret.instance(), session.secret_key().unwrap().instance());
    other.set_keys(KeyPair {
        public: reloaded_public,
        secret: reloaded_secret,
    });

    let values: SlotVector = SlotVector::Int32(vec![1, -2, 3, -4]);
    let ct = other.encrypt(&values, None).unwrap();
    let have: SlotVector = session.decrypt(&ct, None).unwrap();
    assert_eq!(have.len(), 4096);
    match have {
        SlotVector::Int32(v) => assert_eq!(&v[..4], &[1, -2, 3, -4]),
        other => panic!("unexpected {:?}", other.kind()),
    }

    let ct = session.encrypt(&values, Some(ElementKind::Int32)).unwrap();
    match other.decrypt(&ct, Some(ElementKind::Int32)).unwrap() {
        SlotVector::Int32(v) => assert_eq!(&v[..4], &[1, -2, 3, -4]),
        other => panic!("unexpected {:?}", other.kind()),
    }
}

#[test]
fn evaluation_keys_round_trip() {
    let mut session: Session = keyed_session(SchemeKind::Integer);
    let relin: RelinKeys = session.generate_relin_keys().unwrap();
    let galois: GaloisKeys = session.generate_galois_keys(Some(&[1, 2, -1])).unwrap();

    let mut reloaded_relin: RelinKeys = RelinKeys::new(session.context());
    session.load(&mut reloaded_relin, &session.save(&relin).unwrap()).unwrap();
    assert_eq!(reloaded_relin.instance(), relin.instance());

    let mut reloaded_galois: GaloisKeys = GaloisKeys::new(session.context());
    session
        .load_array(&mut reloaded_galois, &session.save_array(&galois).unwrap())
        .unwrap();
    assert_eq!(reloaded_galois.instance(), galois.instance());
}

#[test]
fn keys_do_not_load_under_other_parameters() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let artifact: String = session.save(session.public_key().unwrap()).unwrap();

    let other: Session = Session::new(SessionConfig {
        computation_level: ComputationLevel::Medium,
        ..SessionConfig::default()
    })
    .unwrap();
    let mut public: PublicKey = PublicKey::new(other.context());
    match other.load(&mut public, &artifact) {
        Err(Error::Engine(msg)) => {
            assert_eq!(
                msg,
                "loaded object is not valid for encryption parameters (ParmsId mismatch)"
            )
        }
        res => panic!("unexpected {:?}", res),
    }
    // the held instance survives a failed load
    assert!(!public.is_empty());
}
