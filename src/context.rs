use crate::host::AddressSpace;
use crate::thread::ThreadId;

/// The single slot representing which thread owns the simulated processor,
/// together with that thread's address-space handle.
///
/// An empty context is the idle processor: a normal steady state, not an
/// error. The scheduler is the only writer.
#[derive(Debug, Default)]
pub struct ProcessorContext {
    slot: Option<(ThreadId, AddressSpace)>,
}

impl ProcessorContext {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn current(&self) -> Option<ThreadId> {
        self.slot.map(|(id, _)| id)
    }

    pub fn address_space(&self) -> Option<AddressSpace> {
        self.slot.map(|(_, pt)| pt)
    }

    pub fn set(&mut self, id: ThreadId, page_table: AddressSpace) {
        self.slot = Some((id, page_table));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_idle(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_slot() {
        let mut ctx = ProcessorContext::new();
        assert!(ctx.is_idle());
        assert_eq!(ctx.current(), None);

        ctx.set(4, AddressSpace(0xbeef));
        assert_eq!(ctx.current(), Some(4));
        assert_eq!(ctx.address_space(), Some(AddressSpace(0xbeef)));

        ctx.clear();
        assert!(ctx.is_idle());
        assert_eq!(ctx.address_space(), None);
    }
}
