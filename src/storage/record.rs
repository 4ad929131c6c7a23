//! Schema-bound rows and the bounded row store.

use crate::schema::Value;

/// One row under construction.
///
/// Holds one slot per schema column, in schema order. An empty slot means the
/// column was never set in this row, which is different from `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    slots: Vec<Option<Value>>,
}

impl Record {
    pub fn new(width: usize) -> Self {
        Self {
            slots: vec![None; width],
        }
    }

    /// Stores a value, replacing any earlier value in the same slot.
    pub fn set(&mut self, position: usize, value: Value) {
        self.slots[position] = Some(value);
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.slots.get(position).and_then(Option::as_ref)
    }

    /// True when no column has been set.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Moves the value out of a slot; unset slots yield `Value::Null`.
    pub(crate) fn take(&mut self, position: usize) -> Value {
        self.slots[position].take().unwrap_or(Value::Null)
    }
}

/// Arena of buffered rows with a cursor to the row being written.
///
/// Every row other than the current one is closed and awaiting flush.
#[derive(Debug)]
pub struct RowStore {
    rows: Vec<Record>,
    current: usize,
    width: usize,
    capacity: usize,
}

impl RowStore {
    /// Creates a store holding a single empty current row.
    pub fn new(width: usize, capacity: usize) -> Self {
        let mut rows = Vec::with_capacity(capacity);
        rows.push(Record::new(width));
        Self {
            rows,
            current: 0,
            width,
            capacity,
        }
    }

    pub fn current(&self) -> &Record {
        &self.rows[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Record {
        &mut self.rows[self.current]
    }

    /// Number of rows held, the current row included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A store always holds the current row, so it is empty only after
    /// [`take_all`](Self::take_all) and before the next [`advance`](Self::advance).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when appending another row would exceed capacity.
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    /// Closes the current row and starts a new empty one.
    pub fn advance(&mut self) {
        self.rows.push(Record::new(self.width));
        self.current = self.rows.len() - 1;
    }

    /// Removes and returns every buffered row, leaving the store without a
    /// current row until the next [`advance`](Self::advance).
    pub fn take_all(&mut self) -> Vec<Record> {
        self.current = 0;
        std::mem::take(&mut self.rows)
    }

    /// Number of rows with at least one column set.
    pub fn populated_len(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_empty()).count()
    }
}
