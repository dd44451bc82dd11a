use crate::key::{CompoundKey, Selector};
use crate::scalar::{ScalarError, compare};

/// Pluggable linearization of a compound key into its selector walk order.
///
/// Every map operation consults the same strategy, which is what makes
/// get/set/has/delete agree on key identity. Implementations must be pure
/// and deterministic: the same key always yields the same sequence.
pub trait KeyOrder {
    /// Produces the ordered selector sequence to traverse for `key`.
    fn order(&self, key: &CompoundKey) -> Result<Vec<Selector>, ScalarError>;
}

/// Yields selectors in their definition order, named selectors first, then
/// token selectors (mirroring host enumeration of named vs token fields).
///
/// Never consults the comparator, so it never fails - at the price that two
/// keys with the same fields declared in different order are different keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionOrder;

impl KeyOrder for InsertionOrder {
    fn order(&self, key: &CompoundKey) -> Result<Vec<Selector>, ScalarError> {
        let mut out: Vec<Selector> = key
            .selectors()
            .filter(|s| matches!(s, Selector::Name(_)))
            .cloned()
            .collect();
        out.extend(
            key.selectors()
                .filter(|s| matches!(s, Selector::Token(_)))
                .cloned(),
        );
        Ok(out)
    }
}

/// The default strategy: the same selector set as [`InsertionOrder`], sorted
/// by the scalar comparator applied to each selector viewed as a value.
///
/// Named selectors sort before token selectors, each class by the comparator
/// rules, so keys with the same fields compare identical regardless of how
/// they were declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedOrder;

impl KeyOrder for SortedOrder {
    fn order(&self, key: &CompoundKey) -> Result<Vec<Selector>, ScalarError> {
        let mut out: Vec<Selector> = key.selectors().cloned().collect();
        let mut failed = None;
        out.sort_by(|a, b| match compare(&a.to_value(), &b.to_value()) {
            Ok(ordering) => ordering,
            Err(err) => {
                failed = Some(err);
                std::cmp::Ordering::Equal
            }
        });
        match failed {
            // Selectors are always scalar, so this arm is unreachable for
            // keys built through CompoundKey; kept for the trait contract.
            Some(err) => Err(err),
            None => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn insertion_order_names_before_tokens() {
        let t1 = Token::new("t1");
        let t2 = Token::new("t2");
        let key = CompoundKey::new()
            .field(t1.clone(), 0)
            .field("b", 0)
            .field(t2.clone(), 0)
            .field("a", 0);

        let order = InsertionOrder.order(&key).unwrap();
        assert_eq!(
            order,
            vec![
                Selector::Name("b".into()),
                Selector::Name("a".into()),
                Selector::Token(t1),
                Selector::Token(t2),
            ]
        );
    }

    #[test]
    fn sorted_order_ignores_declaration_order() {
        let k1 = CompoundKey::new().field("b", 0).field("a", 0).field("c", 0);
        let k2 = CompoundKey::new().field("c", 0).field("b", 0).field("a", 0);
        let o1 = SortedOrder.order(&k1).unwrap();
        let o2 = SortedOrder.order(&k2).unwrap();
        assert_eq!(o1, o2);
        assert_eq!(
            o1,
            vec![
                Selector::Name("a".into()),
                Selector::Name("b".into()),
                Selector::Name("c".into()),
            ]
        );
    }

    #[test]
    fn sorted_order_puts_names_before_tokens() {
        let t = Token::new("aaa");
        let key = CompoundKey::new().field(t.clone(), 0).field("zzz", 0);
        let order = SortedOrder.order(&key).unwrap();
        assert_eq!(
            order,
            vec![Selector::Name("zzz".into()), Selector::Token(t)]
        );
    }

    #[test]
    fn strategies_are_deterministic() {
        let key = CompoundKey::new().field("x", 1).field("y", 2);
        assert_eq!(
            SortedOrder.order(&key).unwrap(),
            SortedOrder.order(&key).unwrap()
        );
        assert_eq!(
            InsertionOrder.order(&key).unwrap(),
            InsertionOrder.order(&key).unwrap()
        );
    }
}
