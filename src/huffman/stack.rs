/// A bounded LIFO stack. Used to reassemble a tree from its post-order dump.
pub struct Stack<T> {
    items: Vec<T>,
    capacity: usize,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StackError {
    #[error("Stack is at its capacity of {capacity} items")]
    Full { capacity: usize },
    #[error("Stack is empty")]
    Empty,
}

impl<T> Stack<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Stack {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn push(&mut self, item: T) -> Result<(), StackError> {
        if self.is_full() {
            return Err(StackError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T, StackError> {
        self.items.pop().ok_or(StackError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::{Stack, StackError};

    #[test]
    fn last_in_first_out() {
        let mut stack = Stack::with_capacity(3);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        stack.push(3).unwrap();
        assert!(stack.is_full());
        assert_eq!(stack.push(4), Err(StackError::Full { capacity: 3 }));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.pop(), Err(StackError::Empty));
        assert!(stack.is_empty());
    }
}
