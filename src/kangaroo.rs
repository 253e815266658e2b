//! PIN-error recovery with Pollard's kangaroo.
//!
//! Given helpers with `F = δ·E` (GT written additively) the walk recovers the
//! signed offset `δ = entered PIN − enrolled PIN`. A tame kangaroo leaves the
//! origin, takes `kangaroo_trap` pseudo-random jumps and sets its trap. Two
//! wild kangaroos start at `F` and `−F` and follow the same jump rule; the
//! first covers `δ ≥ 0`, the second `δ < 0`. Once a wild kangaroo lands on a
//! point the tame one visited it follows the tame path into the trap.

use group::Group;
use tracing::debug;

use crate::curve::PairingCurve;
use crate::server::PinErrorHelpers;
use crate::types::{Error, Params, validate_params};

struct JumpTable<C: PairingCurve> {
    distances: Vec<i64>,
    points: Vec<C::Gt>,
}

impl<C: PairingCurve> JumpTable<C> {
    fn new(size: u32, e: &C::Gt) -> Self {
        let distances: Vec<i64> = (0..size).map(|i| 1i64 << i).collect();
        let points = distances
            .iter()
            .map(|d| *e * C::Scalar::from(*d as u64))
            .collect();
        Self { distances, points }
    }

    /// Jump choice depends only on the current position.
    fn index(&self, at: &C::Gt) -> usize {
        let digest = blake3::hash(&C::gt_to_bytes(at));
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        (u64::from_le_bytes(head) % self.distances.len() as u64) as usize
    }

    fn jump(&self, at: &mut C::Gt) -> i64 {
        let i = self.index(at);
        *at += self.points[i];
        self.distances[i]
    }
}

/// Recover the PIN error from [`PinErrorHelpers`]. Offsets with
/// `|δ| ≥ max_pin` are never reported.
pub fn recover<C: PairingCurve>(params: &Params, helpers: &PinErrorHelpers<C>) -> Result<i32, Error> {
    validate_params(*params)?;
    let table = JumpTable::<C>::new(params.kangaroo_table, &helpers.e);
    let max_pin = i64::from(params.max_pin);

    let mut trap = C::Gt::identity();
    let mut dn = 0i64;
    for _ in 0..params.kangaroo_trap {
        dn += table.jump(&mut trap);
    }

    let max_steps = 4 * u64::from(params.kangaroo_trap);
    for (start, sign) in [(helpers.f, 1i64), (-helpers.f, -1i64)] {
        let mut wild = start;
        let mut dm = 0i64;
        let mut steps = 0u64;
        while dm <= dn + max_pin && steps < max_steps {
            if wild == trap {
                let offset = sign * (dn - dm);
                if offset.abs() < max_pin {
                    debug!(steps, "pin error recovered");
                    return i32::try_from(offset).map_err(|_| Error::PinErrorUndetermined);
                }
                break;
            }
            dm += table.jump(&mut wild);
            steps += 1;
        }
    }

    debug!(trap_distance = dn, "pin error not found within bound");
    Err(Error::PinErrorUndetermined)
}
