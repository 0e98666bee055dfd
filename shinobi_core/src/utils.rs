pub trait VecExtensions<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool;
}

impl<T> VecExtensions<T> for Vec<T> {
    fn remove_first_where<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter()
            .position(predicate)
            .map(|index| self.remove(index))
    }
}

pub fn non_empty_messages(messages: Vec<String>) -> Vec<String> {
    messages
        .into_iter()
        .filter(|m| !m.trim().is_empty())
        .collect()
}
