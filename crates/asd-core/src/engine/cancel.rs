use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Señal de cancelación cooperativa, compartible entre el handler de
/// interrupción y el engine.
///
/// Cancelar detiene el agendado de nuevos Steps; una espera de confirmación
/// ya en vuelo termina normalmente (confirma o vence su timeout). Nunca se
/// abandona sin observar el resultado de una transacción enviada.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
