use itertools::izip;

use crate::tests::keyed_session;
use crate::{
    Ciphertext, Complex, ComputationLevel, Decryptor, ElementKind, Evaluator, SchemeKind,
    SecurityTier, Session, SessionConfig, SlotVector,
};

const HALF_T: i64 = (786433 - 1) / 2;

fn integer_values(kind: ElementKind, n: usize) -> SlotVector {
    let signed = |i: usize| ((i as i64 * 7919) % (2 * HALF_T + 1)) - HALF_T;
    let unsigned = |i: usize| (i as u64 * 104729) % 786433;
    match kind {
        ElementKind::Int32 => SlotVector::Int32((0..n).map(|i| signed(i) as i32).collect()),
        ElementKind::UInt32 => SlotVector::UInt32((0..n).map(|i| unsigned(i) as u32).collect()),
        _ => unreachable!(),
    }
}

#[test]
fn integer_kinds_round_trip() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let n: usize = session.codec().unwrap().slot_count().unwrap();
    assert_eq!(n, 4096);

    [ElementKind::Int32, ElementKind::UInt32].iter().for_each(|kind| {
        let values: SlotVector = integer_values(*kind, n);
        let ct: Ciphertext = session.encrypt(&values, Some(*kind)).unwrap();
        let have: SlotVector = session.decrypt(&ct, Some(*kind)).unwrap();
        assert_eq!(have, values, "kind {}", kind);
    });
}

#[test]
fn wide_integer_kinds_fall_back_to_int32() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let n: usize = session.codec().unwrap().slot_count().unwrap();
    let signed: Vec<i64> = (0..n as i64).map(|i| (i * 7919) % (2 * HALF_T + 1) - HALF_T).collect();
    let want: SlotVector = SlotVector::Int32(signed.iter().map(|x| *x as i32).collect());

    let ct: Ciphertext =
        session.encrypt(&SlotVector::Int64(signed), Some(ElementKind::Int64)).unwrap();
    assert_eq!(session.decrypt(&ct, Some(ElementKind::Int64)).unwrap(), want);
    assert_eq!(session.decrypt(&ct, Some(ElementKind::UInt64)).unwrap(), want);
    assert_eq!(session.decrypt(&ct, None).unwrap(), want);

    let small: Vec<u64> = (0..n as u64).map(|i| i % 1000).collect();
    let ct: Ciphertext =
        session.encrypt(&SlotVector::UInt64(small.clone()), Some(ElementKind::UInt64)).unwrap();
    assert_eq!(
        session.decrypt(&ct, Some(ElementKind::UInt64)).unwrap(),
        SlotVector::Int32(small.iter().map(|x| *x as i32).collect())
    );
}

#[test]
fn every_profile_round_trips() {
    for level in ComputationLevel::ALL {
        for tier in SecurityTier::ALL {
            let config = |scheme: SchemeKind| SessionConfig {
                computation_level: level,
                security_bits: tier,
                scheme,
                ..SessionConfig::default()
            };

            let mut session: Session = Session::new(config(SchemeKind::Integer)).unwrap();
            assert!(session.parameters_set(), "{} {}", level, tier);
            session.generate_keys().unwrap();
            let n: usize = session.codec().unwrap().slot_count().unwrap();
            let values: SlotVector = integer_values(ElementKind::Int32, n);
            let ct: Ciphertext = session.encrypt(&values, None).unwrap();
            assert_eq!(session.decrypt(&ct, None).unwrap(), values, "{} {}", level, tier);

            let mut session: Session = Session::new(config(SchemeKind::Approximate)).unwrap();
            assert!(session.parameters_set(), "{} {}", level, tier);
            session.generate_keys().unwrap();
            let scale: f64 = session.config().profile().scale;
            let tolerance: f64 = (2f64.powi(17) / scale).max(1e-6);
            let reals: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin() * 8.0).collect();
            let ct: Ciphertext = session.encrypt(&SlotVector::Double(reals.clone()), None).unwrap();
            match session.decrypt(&ct, None).unwrap() {
                SlotVector::Double(have) => izip!(&have, &reals).for_each(|(h, w)| {
                    assert!((h - w).abs() < tolerance, "{} {}: {} != {}", level, tier, h, w)
                }),
                other => panic!("unexpected {:?}", other.kind()),
            }
        }
    }
}

#[test]
fn approximate_kinds_round_trip() {
    let session: Session = keyed_session(SchemeKind::Approximate);
    let n: usize = session.codec().unwrap().slot_count().unwrap();
    assert_eq!(n, 2048);

    let reals: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).cos() * 100.0).collect();
    let ct: Ciphertext =
        session.encrypt(&SlotVector::Double(reals.clone()), Some(ElementKind::Double)).unwrap();
    match session.decrypt(&ct, Some(ElementKind::Double)).unwrap() {
        SlotVector::Double(have) => {
            assert_eq!(have.len(), n);
            izip!(&have, &reals).for_each(|(h, w)| assert!((h - w).abs() < 1e-6, "{} != {}", h, w));
        }
        other => panic!("unexpected {:?}", other.kind()),
    }

    let complex: Vec<Complex> = (0..n)
        .map(|i| Complex::new(i as f64 / 64.0, -(i as f64) / 128.0))
        .collect();
    let ct: Ciphertext = session
        .encrypt(&SlotVector::ComplexDouble(complex.clone()), Some(ElementKind::ComplexDouble))
        .unwrap();
    match session.decrypt(&ct, Some(ElementKind::ComplexDouble)).unwrap() {
        SlotVector::ComplexDouble(have) => {
            izip!(&have, &complex).for_each(|(h, w)| {
                assert!(
                    (h.re - w.re).abs() < 1e-6 && (h.im - w.im).abs() < 1e-6,
                    "{:?} != {:?}",
                    h,
                    w
                )
            });
        }
        other => panic!("unexpected {:?}", other.kind()),
    }
}

#[test]
fn integer_evaluation() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let evaluator: Evaluator = session.evaluator().unwrap();
    let a: SlotVector = SlotVector::Int32(vec![5, -7, 100, 0]);
    let b: SlotVector = SlotVector::Int32(vec![3, 2, -40, 9]);
    let ct_a: Ciphertext = session.encrypt(&a, Some(ElementKind::Int32)).unwrap();
    let ct_b: Ciphertext = session.encrypt(&b, Some(ElementKind::Int32)).unwrap();

    let decrypt = |ct: &Ciphertext| -> Vec<i32> {
        match session.decrypt(ct, Some(ElementKind::Int32)).unwrap() {
            SlotVector::Int32(v) => v[..4].to_vec(),
            other => panic!("unexpected {:?}", other.kind()),
        }
    };

    assert_eq!(decrypt(&evaluator.add(&ct_a, &ct_b).unwrap()), vec![8, -5, 60, 9]);
    assert_eq!(decrypt(&evaluator.sub(&ct_a, &ct_b).unwrap()), vec![2, -9, 140, -9]);
    assert_eq!(decrypt(&evaluator.negate(&ct_a).unwrap()), vec![-5, 7, -100, 0]);

    let pt_b = session.encode(&b, Some(ElementKind::Int32)).unwrap();
    assert_eq!(decrypt(&evaluator.add_plain(&ct_a, &pt_b).unwrap()), vec![8, -5, 60, 9]);
    assert_eq!(decrypt(&evaluator.sub_plain(&ct_a, &pt_b).unwrap()), vec![2, -9, 140, -9]);
    let product: Ciphertext = evaluator.multiply_plain(&ct_a, &pt_b).unwrap();
    assert_eq!(decrypt(&product), vec![15, -14, -4000, 0]);

    let decryptor: Decryptor =
        Decryptor::new(session.context(), session.secret_key().unwrap()).unwrap();
    assert!(decryptor.invariant_noise_budget(&product).unwrap() > 0);
}

#[test]
fn out_of_range_values_raise_engine_errors() {
    let session: Session = keyed_session(SchemeKind::Integer);
    let too_big: SlotVector = SlotVector::Int32(vec![HALF_T as i32 + 1]);
    assert!(matches!(
        session.encrypt(&too_big, Some(ElementKind::Int32)),
        Err(crate::Error::Engine(_))
    ));
    let too_long: SlotVector = SlotVector::UInt32(vec![0; 4097]);
    assert!(matches!(
        session.encode(&too_long, Some(ElementKind::UInt32)),
        Err(crate::Error::Engine(_))
    ));
}
