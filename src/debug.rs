use std::{
    collections::VecDeque,
    fmt::{self, Write},
};

use crate::{arena::NodeRef, AvlTree};

impl<T> AvlTree<T>
where
    T: Ord + fmt::Display,
{
    /// Writes the tree to `w` in Graphviz dot format, one aligned row per
    /// depth, labelling each node `value:balance`.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeRef),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        for _depth in 0.. {
            let remaining = queue.len();
            if remaining == 0 {
                break;
            }

            write!(w, "{{rank=same; ")?;

            for _ in 0..remaining {
                let item = queue.pop_front().expect("queue length was just checked");

                let node = match item {
                    Item::Node(node) => node,
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let value = &self.node(node).value;
                let balance = self.node(node).balance;
                write!(w, "\"graph{name}-{value}\" [label=\"{value}:{balance}\"]; ")?;

                for child in [self.node(node).left(), self.node(node).right()] {
                    match child {
                        Some(child) => {
                            let child_value = &self.node(child).value;

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{value}\" -> \"graph{name}-{child_value}\";"
                            )?;
                        }

                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{value}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}
