use crate::lane::{Lane, NodePtr};
use std::fmt;

/// Displays the tree of a `Lane`, one node per line, created by
/// [`Lane::dump`].
///
/// Each node shows its element, its height and its balance. Children are
/// indented under their parent, the left one marked `←` and the right one
/// `→`. An empty lane prints as `∅`.
pub struct TreeDump<'a, T> {
    lane: &'a Lane<T>,
}

impl<T> Lane<T> {
    /// Returns a printable view of the tree shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use lane_tree::Lane;
    ///
    /// let lane = Lane::from([1, 2, 3]);
    /// assert_eq!(
    ///     lane.dump().to_string(),
    ///     "2 [h=2, b=+0]\n← 1 [h=1, b=+0]\n→ 3 [h=1, b=+0]"
    /// );
    /// ```
    pub fn dump(&self) -> TreeDump<'_, T> {
        TreeDump { lane: self }
    }
}

impl<T: fmt::Debug> fmt::Display for TreeDump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lane.root_node() {
            None => f.write_str("∅"),
            Some(root) => write_node(f, root, ""),
        }
    }
}

fn write_node<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, node: NodePtr<T>, tab: &str) -> fmt::Result {
    // SAFETY: tree links always point to live nodes of the borrowed lane.
    let node = unsafe { node.as_ref() };
    write!(f, "{:?} [h={}, b={:+}]", node.element, node.height, node.balance)?;
    let child_tab = format!("{}  ", tab);
    if let Some(left) = node.left {
        write!(f, "\n{}← ", tab)?;
        write_node(f, left, &child_tab)?;
    }
    if let Some(right) = node.right {
        write!(f, "\n{}→ ", tab)?;
        write_node(f, right, &child_tab)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Lane;

    #[test]
    fn dump_empty() {
        assert_eq!(Lane::<u8>::new().dump().to_string(), "∅");
    }

    #[test]
    fn dump_nested() {
        let lane = Lane::from([2.0, 1.0, 3.0, 4.0]);
        assert_eq!(
            lane.dump().to_string(),
            "2.0 [h=3, b=+1]\n← 1.0 [h=1, b=+0]\n→ 3.0 [h=2, b=+1]\n  → 4.0 [h=1, b=+0]"
        );
    }
}
