use itertools::izip;

use crate::tests::{PLAIN_MODULUS, bfv_context, ckks_context};
use crate::{
    BatchEncoder, Ciphertext, CkksEncoder, Context, Decryptor, Encryptor, Evaluator, GaloisKeys,
    KeyGenerator, MemoryPool, Plaintext, PublicKey, RelinKeys, SecretKey, SecurityLevel,
};

#[test]
fn bfv_encrypt_decrypt() {
    [SecurityLevel::Tc128, SecurityLevel::Tc192, SecurityLevel::Tc256]
        .iter()
        .for_each(|level| {
            println!("test bfv_encrypt_decrypt level: {:?}", level);
            test_bfv_encrypt_decrypt(4096, *level);
        });
}

fn test_bfv_encrypt_decrypt(n: usize, level: SecurityLevel) {
    let pool: MemoryPool = MemoryPool::new();
    let context: Context = bfv_context(n, level, &pool);
    assert!(context.parameters_set());

    let mut keygen: KeyGenerator = KeyGenerator::with_seed(&context, [0u8; 32], &pool).unwrap();
    let pk: PublicKey = keygen.create_public_key().unwrap();
    let sk: SecretKey = keygen.secret_key().clone();

    let encoder: BatchEncoder = BatchEncoder::new(&context).unwrap();
    let mut encryptor: Encryptor = Encryptor::with_seed(&context, &pk, [1u8; 32], &pool).unwrap();
    let decryptor: Decryptor = Decryptor::new(&context, &sk, &pool).unwrap();

    let half: i64 = (PLAIN_MODULUS as i64 - 1) / 2;
    let values: Vec<i64> = (0..n as i64).map(|i| (i * 7919) % (2 * half + 1) - half).collect();
    let pt: Plaintext = encoder.encode_i64(&values, &pool).unwrap();
    let ct: Ciphertext = encryptor.encrypt(&pt).unwrap();
    assert!(decryptor.invariant_noise_budget(&ct).unwrap() > 0);

    let have: Vec<i64> = encoder.decode_i64(&decryptor.decrypt(&ct).unwrap(), &pool).unwrap();
    assert_eq!(have, values);
}

#[test]
fn bfv_evaluator() {
    let n: usize = 4096;
    let pool: MemoryPool = MemoryPool::new();
    let context: Context = bfv_context(n, SecurityLevel::Tc128, &pool);
    let mut keygen: KeyGenerator = KeyGenerator::with_seed(&context, [2u8; 32], &pool).unwrap();
    let pk: PublicKey = keygen.create_public_key().unwrap();
    let encoder: BatchEncoder = BatchEncoder::new(&context).unwrap();
    let mut encryptor: Encryptor = Encryptor::with_seed(&context, &pk, [3u8; 32], &pool).unwrap();
    let decryptor: Decryptor = Decryptor::new(&context, keygen.secret_key(), &pool).unwrap();
    let evaluator: Evaluator = Evaluator::new(&context).unwrap();

    let t: u64 = PLAIN_MODULUS;
    let a: Vec<u64> = (0..n as u64).map(|i| (i * 31 + 5) % t).collect();
    let b: Vec<u64> = (0..n as u64).map(|i| (i * i + 1) % t).collect();
    let pt_a: Plaintext = encoder.encode_u64(&a, &pool).unwrap();
    let pt_b: Plaintext = encoder.encode_u64(&b, &pool).unwrap();
    let ct_a: Ciphertext = encryptor.encrypt(&pt_a).unwrap();
    let ct_b: Ciphertext = encryptor.encrypt(&pt_b).unwrap();

    let decode = |ct: &Ciphertext| -> Vec<u64> {
        encoder
            .decode_u64(&decryptor.decrypt(ct).unwrap(), &pool)
            .unwrap()
    };

    let sum: Vec<u64> = izip!(&a, &b).map(|(x, y)| (x + y) % t).collect();
    assert_eq!(decode(&evaluator.add(&ct_a, &ct_b).unwrap()), sum);
    assert_eq!(decode(&evaluator.add_plain(&ct_a, &pt_b).unwrap()), sum);

    let diff: Vec<u64> = izip!(&a, &b).map(|(x, y)| (x + t - y) % t).collect();
    assert_eq!(decode(&evaluator.sub(&ct_a, &ct_b).unwrap()), diff);
    assert_eq!(decode(&evaluator.sub_plain(&ct_a, &pt_b).unwrap()), diff);

    let neg: Vec<u64> = a.iter().map(|x| (t - x) % t).collect();
    assert_eq!(decode(&evaluator.negate(&ct_a).unwrap()), neg);

    let prod: Vec<u64> = izip!(&a, &b)
        .map(|(x, y)| ((*x as u128 * *y as u128) % t as u128) as u64)
        .collect();
    let ct_prod: Ciphertext = evaluator.multiply_plain(&ct_a, &pt_b).unwrap();
    assert!(decryptor.invariant_noise_budget(&ct_prod).unwrap() > 0);
    assert_eq!(decode(&ct_prod), prod);
}

#[test]
fn ckks_encrypt_decrypt() {
    let n: usize = 4096;
    let pool: MemoryPool = MemoryPool::new();
    let context: Context = ckks_context(n, SecurityLevel::Tc128, &pool);
    let mut keygen: KeyGenerator = KeyGenerator::with_seed(&context, [4u8; 32], &pool).unwrap();
    let pk: PublicKey = keygen.create_public_key().unwrap();
    let encoder: CkksEncoder = CkksEncoder::new(&context).unwrap();
    let mut encryptor: Encryptor = Encryptor::with_seed(&context, &pk, [5u8; 32], &pool).unwrap();
    let decryptor: Decryptor = Decryptor::new(&context, keygen.secret_key(), &pool).unwrap();
    let evaluator: Evaluator = Evaluator::new(&context).unwrap();

    let scale: f64 = (1u64 << 40) as f64;
    let values: Vec<f64> = (0..encoder.slot_count())
        .map(|i| (i as f64 * 0.37).sin() * 10.0)
        .collect();
    let pt: Plaintext = encoder.encode_f64(&values, scale, &pool).unwrap();
    let ct: Ciphertext = encryptor.encrypt(&pt).unwrap();
    assert_eq!(ct.scale(), scale);
    let have: Vec<f64> = encoder.decode_f64(&decryptor.decrypt(&ct).unwrap(), &pool).unwrap();
    izip!(&have, &values).for_each(|(h, w)| assert!((h - w).abs() < 1e-4, "{} != {}", h, w));

    let small_scale: f64 = (1u64 << 30) as f64;
    let weights: Vec<f64> = (0..encoder.slot_count()).map(|i| (i % 5) as f64 - 2.0).collect();
    let pt_a: Plaintext = encoder.encode_f64(&values, small_scale, &pool).unwrap();
    let pt_w: Plaintext = encoder.encode_f64(&weights, small_scale, &pool).unwrap();
    let ct_a: Ciphertext = encryptor.encrypt(&pt_a).unwrap();
    let ct_prod: Ciphertext = evaluator.multiply_plain(&ct_a, &pt_w).unwrap();
    assert_eq!(ct_prod.scale(), small_scale * small_scale);
    let have: Vec<f64> = encoder.decode_f64(&decryptor.decrypt(&ct_prod).unwrap(), &pool).unwrap();
    izip!(&have, &values, &weights)
        .for_each(|(h, v, w)| assert!((h - v * w).abs() < 1e-3, "{} != {}", h, v * w));

    assert!(evaluator.add_plain(&ct, &pt_w).is_err());
}

#[test]
fn relin_and_galois_keys() {
    let n: usize = 4096;
    let pool: MemoryPool = MemoryPool::new();
    let context: Context = bfv_context(n, SecurityLevel::Tc128, &pool);
    let mut keygen: KeyGenerator = KeyGenerator::with_seed(&context, [6u8; 32], &pool).unwrap();

    let relin: RelinKeys = keygen.create_relin_keys().unwrap();
    assert!(!relin.is_empty());
    assert_eq!(relin.parms_id(), context.parms_id());

    let galois: GaloisKeys = keygen.create_galois_keys(&[3, 8191]).unwrap();
    assert_eq!(galois.galois_elts(), vec![3, 8191]);
    assert!(keygen.create_galois_keys(&[4]).is_err());

    let mut resumed: KeyGenerator =
        KeyGenerator::from_secret_key(&context, keygen.secret_key(), &pool).unwrap();
    assert!(resumed.create_relin_keys().is_ok());
    assert!(KeyGenerator::from_secret_key(&context, &SecretKey::new(&pool), &pool).is_err());
}

#[test]
fn objects_release_pool_memory() {
    let pool: MemoryPool = MemoryPool::new();
    {
        let context: Context = bfv_context(4096, SecurityLevel::Tc128, &pool);
        let mut keygen: KeyGenerator = KeyGenerator::with_seed(&context, [7u8; 32], &pool).unwrap();
        let _pk: PublicKey = keygen.create_public_key().unwrap();
        assert!(pool.live_allocations() >= 3);
    }
    assert_eq!(pool.live_allocations(), 0);
    assert_eq!(pool.live_bytes(), 0);
}
