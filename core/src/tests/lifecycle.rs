use crate::tests::keyed_session;
use crate::{
    Ciphertext, ComputationLevel, ElementKind, Error, Persist, Plaintext, SchemeKind, Session,
    SessionConfig, SlotVector, TypedCodec,
};

#[test]
fn delete_twice_is_a_no_op() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let mut ct: Ciphertext = session.encrypt(&SlotVector::Int32(vec![1, 2]), None).unwrap();
    let pool = session.context().pool();
    let live: usize = pool.live_allocations();

    ct.delete();
    assert!(ct.instance().is_none());
    assert_eq!(pool.live_allocations(), live - 1);
    ct.delete();
    assert!(ct.instance().is_none());
    assert_eq!(pool.live_allocations(), live - 1);

    assert!(matches!(ct.save(Default::default()), Err(Error::Released("ciphertext"))));
    assert!(matches!(
        session.decrypt(&ct, None),
        Err(Error::Released("ciphertext"))
    ));
}

#[test]
fn repeated_loads_do_not_leak() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let ct: Ciphertext = session.encrypt(&SlotVector::Int32(vec![7]), None).unwrap();
    let artifact: Vec<u8> = session.save_array(&ct).unwrap();
    let pool = session.context().pool();

    let mut target: Ciphertext = Ciphertext::new(session.context());
    let live: usize = pool.live_allocations();
    let bytes: usize = pool.live_bytes();
    for _ in 0..10 {
        session.load_array(&mut target, &artifact).unwrap();
    }
    assert_eq!(pool.live_allocations(), live);
    assert!(pool.live_bytes() > bytes);

    let loaded_bytes: usize = pool.live_bytes();
    for _ in 0..10 {
        session.load_array(&mut target, &artifact).unwrap();
        assert_eq!(pool.live_bytes(), loaded_bytes);
    }
}

#[test]
fn wrappers_release_on_drop() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let pool = session.context().pool();
    let live: usize = pool.live_allocations();
    {
        let codec: Box<dyn TypedCodec> = session.codec().unwrap();
        let pt: Plaintext = codec
            .encode(
                &SlotVector::UInt32(vec![1, 2, 3]),
                Some(ElementKind::UInt32),
                &Default::default(),
            )
            .unwrap();
        let _copy: SlotVector = codec.decode(&pt, Some(ElementKind::UInt32)).unwrap();
        assert_eq!(pool.live_allocations(), live + 1);
    }
    assert_eq!(pool.live_allocations(), live);
}

#[test]
fn reconfigure_replaces_context() {
    let mut session: Session = keyed_session(SchemeKind::Integer);
    let old = session.context().pool().clone();
    assert!(old.live_allocations() > 0);

    session
        .reconfigure(SessionConfig {
            computation_level: ComputationLevel::Medium,
            scheme: SchemeKind::Approximate,
            ..SessionConfig::default()
        })
        .unwrap();
    assert_eq!(old.live_allocations(), 0);
    assert!(session.public_key().is_none());
    assert_eq!(session.context().poly_modulus_degree().unwrap(), 8192);
    assert_eq!(session.codec().unwrap().slot_count().unwrap(), 4096);
}

#[test]
fn sessions_are_independent() {
    let a: Session = keyed_session(SchemeKind::Integer);
    let b: Session = keyed_session(SchemeKind::Integer);
    let ct: Ciphertext = a.encrypt(&SlotVector::Int32(vec![11]), None).unwrap();
    // same parameters, different secret key: decryption yields noise, not an error
    let have: SlotVector = b.decrypt(&ct, None).unwrap();
    assert_ne!(have, a.decrypt(&ct, None).unwrap());
    assert!(!a.context().pool().ptr_eq(b.context().pool()));
}
