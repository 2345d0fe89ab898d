use arena_avl::AvlTree;

fn display(tree: &AvlTree<i32>) {
    tree.traverse(|node| {
        print!("{}[{}]", node.value(), node.balance());
        match node.parent_value() {
            Some(parent) => print!("[{parent}] "),
            None => print!("[NoVal] "),
        }
    });
    println!();
}

fn main() {
    println!("Display format : \"value[balance][parentvalue]\"");
    println!();

    // A right rotation: three inserts leaning left, plus one duplicate.
    let mut tree = AvlTree::new();

    println!("Insert 16, -35, -99, -35");
    for value in [16, -35, -99, -35] {
        tree.insert(value);
    }
    tree.assert_invariants();
    assert_eq!(tree.len(), 3);
    display(&tree);

    println!("Erase -35, -99, 16");
    for value in [-35, -99, 16] {
        assert!(tree.remove(&value).is_some());
    }
    tree.assert_invariants();
    assert!(tree.is_empty());
    println!();

    // A left rotation in the root's right subtree.
    let mut tree = AvlTree::new();

    println!("Insert -35, 16, -99, 20, 38");
    for value in [-35, 16, -99, 20, 38] {
        tree.insert(value);
    }
    tree.assert_invariants();
    display(&tree);

    println!("Erase 20, -99, 38, -35, 16");
    for value in [20, -99, 38, -35, 16] {
        assert!(tree.remove(&value).is_some());
    }
    tree.assert_invariants();
    assert!(tree.is_empty());
    println!();

    // A double right-left rotation, triggered by erasing the root's left
    // subtree out from under it.
    let mut tree = AvlTree::new();

    println!("Insert 19, 10, 34, 8, 12, 26, 72, 22, 29");
    for value in [19, 10, 34, 8, 12, 26, 72, 22, 29] {
        tree.insert(value);
    }
    tree.assert_invariants();

    println!("Erase 8, 12");
    for value in [8, 12] {
        assert!(tree.remove(&value).is_some());
    }
    tree.assert_invariants();
    display(&tree);
    println!();

    // A double left-right rotation, triggered by the final insert.
    let mut tree = AvlTree::new();

    println!("Insert 50, 25, 77, 10, 42, 64, 80, 45");
    for value in [50, 25, 77, 10, 42, 64, 80, 45] {
        tree.insert(value);
    }
    tree.assert_invariants();

    println!("Erase 64, 80");
    for value in [64, 80] {
        assert!(tree.remove(&value).is_some());
    }
    tree.assert_invariants();
    display(&tree);
}
