//! List, Set, Map, Stack and the cursor protocol

use proptest::prelude::*;
use valuekit::prelude::*;

#[derive(Debug, Clone)]
struct Person {
    name: String,
    age: i32,
}

fn person(name: &str, age: i32) -> Person {
    Person {
        name: name.to_string(),
        age,
    }
}

proptest! {
    #[test]
    fn set_add_is_idempotent(x in any::<i64>(), others in proptest::collection::vec(any::<i64>(), 0..8)) {
        let mut s: Set<Long> = others.into_iter().map(Long).collect();
        s.add(Long(x));
        let size = s.size();
        prop_assert!(!s.add(Long(x)));
        prop_assert_eq!(s.size(), size);
    }
}

#[test]
fn test_list_index_of_uses_equals() {
    let list: List<String> = ["a", "b", "a"].iter().map(|s| s.to_string()).collect();
    assert_eq!(list.index_of(&"a".to_string()), 0);
    assert_eq!(list.last_index_of(&"a".to_string()), 2);
    assert_eq!(list.index_of(&"z".to_string()), -1);
}

#[test]
fn test_list_out_of_range() {
    let mut list: List<i32> = vec![1].into();
    let err = list.get(3).unwrap_err();
    assert!(err.is_index_out_of_range());
    assert_eq!(err.to_string(), "Index: 3, Size: 1");
    assert!(list.add_at(2, 9).is_err());
}

#[test]
fn test_comparator_chain() {
    let mut people: List<Person> = vec![
        person("carol", 30),
        person("bob", 25),
        person("alice", 30),
        person("dave", 20),
    ]
    .into();
    let order = Comparator::comparing(|p: &Person| p.age)
        .then_comparing_by(|p: &Person| p.name.clone());
    people.sort(&order);
    let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["dave", "bob", "alice", "carol"]);
}

#[test]
fn test_map_put_and_views() {
    let mut map: Map<String, i32> = Map::new();
    assert_eq!(map.put("a".to_string(), 1), None);
    assert_eq!(map.put("a".to_string(), 2), Some(1));
    map.put("b".to_string(), 3);
    assert!(map.put_if_absent("a".to_string(), 9).is_some());
    assert_eq!(map.get_or_default(&"zz".to_string(), &0), &0);
    assert_eq!(map.size(), 2);

    map.key_set().remove(&"a".to_string());
    assert!(!map.contains_key(&"a".to_string()));
    map.values().clear();
    assert!(map.is_empty());
}

#[test]
fn test_stack_push_pop_peek() {
    let mut stack = Stack::new();
    stack.push(1);
    stack.push(2);
    assert_eq!(stack.pop().unwrap(), 2);
    assert_eq!(stack.peek().unwrap(), &1);
    stack.pop().unwrap();
    assert!(stack.pop().unwrap_err().is_no_such_element());
}

#[test]
fn test_cursor_protocol() {
    let mut list: List<i32> = vec![1, 2, 3, 4].into();
    {
        let mut cursor = list.iterator();
        assert!(cursor.remove().unwrap_err().is_illegal_state());
        while cursor.has_next() {
            if cursor.next().unwrap() % 2 == 0 {
                cursor.remove().unwrap();
            }
        }
        assert!(cursor.next().unwrap_err().is_no_such_element());
    }
    assert_eq!(list.as_slice(), &[1, 3]);
}

#[test]
fn test_set_cursor_removal() {
    let mut set: Set<i32> = (1..=5).collect();
    {
        let mut cursor = set.iterator();
        while cursor.has_next() {
            if *cursor.next().unwrap() > 3 {
                cursor.remove().unwrap();
            }
        }
    }
    assert_eq!(set.size(), 3);
    assert!(!set.contains(&4));
}

#[test]
fn test_set_algebra() {
    let mut a: Set<i32> = (1..=5).collect();
    let b: Set<i32> = (3..=7).collect();
    assert!(a.retain_all(&b));
    assert_eq!(a.to_vec(), vec![3, 4, 5]);
    assert!(a.remove_all(&b));
    assert!(a.is_empty());
}
