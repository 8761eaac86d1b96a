use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::modulus::Modulus;
use crate::ntt::Table;
use crate::params::{ParmsId, SchemeType};
use crate::plaintext::Plaintext;
use crate::pool::{Allocation, MemoryPool};

/// SIMD encoding of `n` integers modulo a batching-friendly plain modulus.
///
/// Slot values are the evaluations of the plaintext polynomial at the
/// primitive `2n`-th roots of unity modulo `t`, so slot-wise products match
/// polynomial products.
pub struct BatchEncoder {
    context: Context,
}

impl BatchEncoder {
    pub fn new(context: &Context) -> NativeResult<Self> {
        context.require_scheme(SchemeType::Bfv)?;
        context.plain_table()?;
        Ok(Self {
            context: context.clone(),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.context.poly_modulus_degree()
    }

    fn table(&self) -> NativeResult<&Table> {
        self.context.plain_table()
    }

    fn plain_modulus(&self) -> NativeResult<Modulus> {
        self.context.plain_modulus().copied()
    }

    fn encode_slots(&self, mut slots: Vec<u64>, pool: &MemoryPool) -> NativeResult<Plaintext> {
        let n: usize = self.slot_count();
        slots.resize(n, 0);
        self.table()?.backward_inplace(&mut slots);
        Ok(Plaintext::from_parts(ParmsId::ZERO, 1.0, n, 0, slots, pool))
    }

    fn check_len(&self, len: usize) -> NativeResult<()> {
        if len > self.slot_count() {
            return Err(NativeException::invalid_argument(format!(
                "values_matrix size {} is too large for {} slots",
                len,
                self.slot_count()
            )));
        }
        Ok(())
    }

    pub fn encode_u64(&self, values: &[u64], pool: &MemoryPool) -> NativeResult<Plaintext> {
        self.check_len(values.len())?;
        let t: Modulus = self.plain_modulus()?;
        if let Some(v) = values.iter().find(|v| **v >= t.q()) {
            return Err(NativeException::invalid_argument(format!(
                "input value {} is larger than plain_modulus {}",
                v,
                t.q()
            )));
        }
        self.encode_slots(values.to_vec(), pool)
    }

    pub fn encode_i64(&self, values: &[i64], pool: &MemoryPool) -> NativeResult<Plaintext> {
        self.check_len(values.len())?;
        let t: Modulus = self.plain_modulus()?;
        let bound: u64 = (t.q() - 1) >> 1;
        if let Some(v) = values.iter().find(|v| v.unsigned_abs() > bound) {
            return Err(NativeException::invalid_argument(format!(
                "input value {} is larger than plain_modulus {} allows",
                v,
                t.q()
            )));
        }
        self.encode_slots(values.iter().map(|v| t.reduce_i64(*v)).collect(), pool)
    }

    fn decode_slots(&self, plaintext: &Plaintext, pool: &MemoryPool) -> NativeResult<Vec<u64>> {
        plaintext.require_valid(&self.context)?;
        let mut slots: Vec<u64> = plaintext.data().to_vec();
        let _scratch: Allocation = pool.allocate(slots.len() * size_of::<u64>());
        self.table()?.forward_inplace(&mut slots);
        Ok(slots)
    }

    pub fn decode_u64(&self, plaintext: &Plaintext, pool: &MemoryPool) -> NativeResult<Vec<u64>> {
        self.decode_slots(plaintext, pool)
    }

    /// Decodes slots to their centered representatives.
    pub fn decode_i64(&self, plaintext: &Plaintext, pool: &MemoryPool) -> NativeResult<Vec<i64>> {
        let t: Modulus = self.plain_modulus()?;
        Ok(self
            .decode_slots(plaintext, pool)?
            .into_iter()
            .map(|x| t.center(x))
            .collect())
    }
}
