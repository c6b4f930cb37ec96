//! Reference-counted cursor requests reconciled against native cursors.
//!
//! Each cursor type keeps a count of outstanding pushes and, while the count
//! is positive, the native handle created for it. Types are layered: the
//! visible cursor is the most recently pushed type that is still active, or
//! the platform default when nothing is. Pushing a type that is already
//! active counts as a fresh push and brings it back on top.
//!
//! Popping a type with a zero count is ignored with a warning. Logic that
//! pops more than it pushed is buggy, but a stray pop must not take the
//! cursor state negative or tear down a cursor another widget still holds.

use std::collections::HashMap;

use log::{trace, warn};

use super::action::{CursorCmd, CursorType};

/// Native cursor API the stack drives.
pub trait CursorDevice {
    type Cursor;

    fn create_cursor(&mut self, cursor: CursorType) -> Self::Cursor;
    fn show_cursor(&mut self, cursor: &Self::Cursor);
    fn destroy_cursor(&mut self, cursor: Self::Cursor);
    fn show_default_cursor(&mut self);
}

struct Entry<H> {
    count: u32,
    handle: H,
}

pub struct CursorStack<H> {
    entries: HashMap<CursorType, Entry<H>>,
    /// Active types, oldest first. The last one is on screen.
    order: Vec<CursorType>,
}

impl<H> Default for CursorStack<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<H> CursorStack<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<D>(&mut self, cmd: CursorCmd, device: &mut D) -> bool
    where
        D: CursorDevice<Cursor = H>,
    {
        match cmd {
            CursorCmd::Push(cursor) => {
                self.push(cursor, device);
                true
            }
            CursorCmd::Pop(cursor) => self.pop(cursor, device),
        }
    }

    /// Increment `cursor`'s count, creating its native cursor on 0 -> 1.
    pub fn push<D>(&mut self, cursor: CursorType, device: &mut D)
    where
        D: CursorDevice<Cursor = H>,
    {
        if let Some(entry) = self.entries.get_mut(&cursor) {
            entry.count += 1;
            trace!("Cursor {:?} pushed (count {})", cursor, entry.count);
            // Re-pushing a buried type brings it back on top
            if self.order.last() != Some(&cursor) {
                self.order.retain(|c| *c != cursor);
                self.order.push(cursor);
                device.show_cursor(&entry.handle);
            }
            return;
        }

        let handle = device.create_cursor(cursor);
        device.show_cursor(&handle);
        self.entries.insert(cursor, Entry { count: 1, handle });
        self.order.push(cursor);
        trace!("Cursor {:?} activated", cursor);
    }

    /// Decrement `cursor`'s count, destroying its native cursor on 1 -> 0.
    ///
    /// Returns false when the type had nothing to pop.
    pub fn pop<D>(&mut self, cursor: CursorType, device: &mut D) -> bool
    where
        D: CursorDevice<Cursor = H>,
    {
        let Some(entry) = self.entries.get_mut(&cursor) else {
            warn!("Cursor {:?} popped with no matching push, ignoring", cursor);
            return false;
        };

        entry.count -= 1;
        if entry.count > 0 {
            trace!("Cursor {:?} popped (count {})", cursor, entry.count);
            return true;
        }

        let was_top = self.order.last() == Some(&cursor);
        self.order.retain(|c| *c != cursor);
        if let Some(entry) = self.entries.remove(&cursor) {
            device.destroy_cursor(entry.handle);
        }
        trace!("Cursor {:?} deactivated", cursor);

        if was_top {
            match self.order.last().and_then(|c| self.entries.get(c)) {
                Some(next) => device.show_cursor(&next.handle),
                None => device.show_default_cursor(),
            }
        }
        true
    }

    pub fn count(&self, cursor: CursorType) -> u32 {
        self.entries.get(&cursor).map(|e| e.count).unwrap_or(0)
    }

    pub fn is_active(&self, cursor: CursorType) -> bool {
        self.count(cursor) > 0
    }

    /// Type currently on screen, `None` meaning the platform default.
    pub fn current(&self) -> Option<CursorType> {
        self.order.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(CursorType),
        Show(CursorType),
        Destroy(CursorType),
        Default,
    }

    #[derive(Default)]
    struct FakeDevice {
        calls: Vec<Call>,
    }

    impl CursorDevice for FakeDevice {
        type Cursor = CursorType;

        fn create_cursor(&mut self, cursor: CursorType) -> CursorType {
            self.calls.push(Call::Create(cursor));
            cursor
        }
        fn show_cursor(&mut self, cursor: &CursorType) {
            self.calls.push(Call::Show(*cursor));
        }
        fn destroy_cursor(&mut self, cursor: CursorType) {
            self.calls.push(Call::Destroy(cursor));
        }
        fn show_default_cursor(&mut self) {
            self.calls.push(Call::Default);
        }
    }

    #[test]
    fn test_push_push_pop_pop_hand() {
        let mut dev = FakeDevice::default();
        let mut stack = CursorStack::new();

        stack.push(CursorType::Hand, &mut dev);
        stack.push(CursorType::Hand, &mut dev);
        assert!(stack.pop(CursorType::Hand, &mut dev));
        assert!(stack.is_active(CursorType::Hand));
        assert_eq!(stack.count(CursorType::Hand), 1);

        assert!(stack.pop(CursorType::Hand, &mut dev));
        assert!(!stack.is_active(CursorType::Hand));
        assert_eq!(stack.current(), None);

        assert_eq!(
            dev.calls,
            vec![
                Call::Create(CursorType::Hand),
                Call::Show(CursorType::Hand),
                Call::Destroy(CursorType::Hand),
                Call::Default,
            ]
        );
    }

    #[test]
    fn test_pop_underflow_is_noop() {
        let mut dev = FakeDevice::default();
        let mut stack: CursorStack<CursorType> = CursorStack::new();

        assert!(!stack.pop(CursorType::IBeam, &mut dev));
        assert_eq!(stack.count(CursorType::IBeam), 0);
        assert!(dev.calls.is_empty());

        stack.push(CursorType::IBeam, &mut dev);
        assert!(stack.pop(CursorType::IBeam, &mut dev));
        assert!(!stack.pop(CursorType::IBeam, &mut dev));
        assert_eq!(stack.count(CursorType::IBeam), 0);
    }

    #[test]
    fn test_layered_restores_previous() {
        let mut dev = FakeDevice::default();
        let mut stack = CursorStack::new();

        stack.push(CursorType::IBeam, &mut dev);
        stack.push(CursorType::Wait, &mut dev);
        assert_eq!(stack.current(), Some(CursorType::Wait));

        stack.pop(CursorType::Wait, &mut dev);
        assert_eq!(stack.current(), Some(CursorType::IBeam));
        assert_eq!(dev.calls.last(), Some(&Call::Show(CursorType::IBeam)));

        // Popping a buried type leaves the visible one alone
        stack.push(CursorType::Hand, &mut dev);
        dev.calls.clear();
        stack.pop(CursorType::IBeam, &mut dev);
        assert_eq!(dev.calls, vec![Call::Destroy(CursorType::IBeam)]);
        assert_eq!(stack.current(), Some(CursorType::Hand));
    }

    #[test]
    fn test_repush_moves_type_on_top() {
        let mut dev = FakeDevice::default();
        let mut stack = CursorStack::new();

        stack.push(CursorType::IBeam, &mut dev);
        stack.push(CursorType::Wait, &mut dev);
        dev.calls.clear();
        stack.push(CursorType::IBeam, &mut dev);
        assert_eq!(stack.current(), Some(CursorType::IBeam));
        assert_eq!(stack.count(CursorType::IBeam), 2);
        assert_eq!(dev.calls, vec![Call::Show(CursorType::IBeam)]);

        // Wait is buried now; releasing it keeps IBeam on screen
        dev.calls.clear();
        stack.pop(CursorType::Wait, &mut dev);
        assert_eq!(dev.calls, vec![Call::Destroy(CursorType::Wait)]);
        assert_eq!(stack.current(), Some(CursorType::IBeam));

        // One IBeam push is still outstanding
        stack.pop(CursorType::IBeam, &mut dev);
        assert_eq!(stack.current(), Some(CursorType::IBeam));
        stack.pop(CursorType::IBeam, &mut dev);
        assert_eq!(stack.current(), None);
        assert_eq!(dev.calls.last(), Some(&Call::Default));
    }

    #[test]
    fn test_balance_matches_running_sum() {
        let mut dev = FakeDevice::default();
        let mut stack = CursorStack::new();
        let ops = [
            CursorCmd::Push(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
            CursorCmd::Push(CursorType::Hand),
            CursorCmd::Push(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
            CursorCmd::Push(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
            CursorCmd::Pop(CursorType::Hand),
        ];

        let mut sum: i64 = 0;
        for op in ops {
            match op {
                CursorCmd::Push(_) => sum += 1,
                CursorCmd::Pop(_) => sum = (sum - 1).max(0),
            }
            stack.apply(op, &mut dev);
            assert_eq!(stack.count(CursorType::Hand) as i64, sum);
            assert_eq!(stack.is_active(CursorType::Hand), sum > 0);
        }
    }
}
