use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display};
use thiserror::Error;

use crate::event_log::Activity;

/// Reserved label that stands for a silent leaf in the tuple form
pub const TAU_LABEL: &str = "tau";

///
/// Errors that can occur when building or parsing a [`ProcessTree`]
///
#[derive(Debug, Error)]
pub enum ProcessTreeError {
    /// A child was added to a leaf node
    #[error("cannot add a child to leaf {0}")]
    ChildOfLeaf(LeafLabel),
    /// An operator tuple is empty or does not start with an operator token
    #[error("operator tuple does not start with an operator token")]
    MissingOperatorKind,
    /// An operator tuple starts with a token that is no known operator
    #[error("unknown operator token `{0}`")]
    UnknownOperator(String),
    /// The input is not valid JSON for the tuple form
    #[error("invalid process tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

///
/// Leaf in a process tree
///
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub enum LeafLabel {
    /// Non-silent activity leaf
    Activity(Activity),
    /// Silent activity leaf
    Tau,
}

impl Display for LeafLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafLabel::Activity(label) => write!(f, "'{label}'"),
            LeafLabel::Tau => write!(f, "{TAU_LABEL}"),
        }
    }
}

///
/// Operator type enum for [`Operator`]
///
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub enum OperatorType {
    /// Sequence operator
    Sequence,
    /// Exclusive choice operator
    ExclusiveChoice,
    /// Concurrency operator
    Parallel,
    /// Loop operator: the first child is the body, all others are redo parts
    Loop,
}

impl OperatorType {
    /// All operator types
    pub const ALL: [OperatorType; 4] = [
        OperatorType::Sequence,
        OperatorType::ExclusiveChoice,
        OperatorType::Parallel,
        OperatorType::Loop,
    ];

    /// Token used in the tuple form (`seq`, `xor`, `par`, `loop`)
    pub fn token(&self) -> &'static str {
        match self {
            OperatorType::Sequence => "seq",
            OperatorType::ExclusiveChoice => "xor",
            OperatorType::Parallel => "par",
            OperatorType::Loop => "loop",
        }
    }

    /// Parses a tuple form token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Symbol used in the textual notation (`->`, `X`, `+`, `*`)
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorType::Sequence => "->",
            OperatorType::ExclusiveChoice => "X",
            OperatorType::Parallel => "+",
            OperatorType::Loop => "*",
        }
    }
}

///
/// Canonical tuple form of a process tree node
///
/// A leaf is its label ([`TAU_LABEL`] for silent leaves), an operator is a list
/// whose first element is the operator token followed by the children, e.g.
/// `["seq", "a", ["xor", "b", "tau"]]`.
///
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum TreeTuple {
    /// Leaf label or operator token
    Label(String),
    /// Operator token followed by the children
    Tuple(Vec<TreeTuple>),
}

impl From<&str> for TreeTuple {
    fn from(value: &str) -> Self {
        TreeTuple::Label(value.to_string())
    }
}

///
/// An operator node in a process tree
///
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Operator {
    /// The [`OperatorType`] of the node
    pub operator_type: OperatorType,
    /// The children nodes of the operator node
    pub children: Vec<Node>,
}

impl Operator {
    ///
    /// Creates a new [`Operator`] without children
    ///
    pub fn new(operator_type: OperatorType) -> Self {
        Self {
            operator_type,
            children: Vec::new(),
        }
    }
}

///
/// Node in a process tree
///
/// Nodes own their children, so equality and hashing are structural.
/// (De-)serialized in the [`TreeTuple`] form.
///
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeTuple", into = "TreeTuple")]
pub enum Node {
    /// Operator node of a process tree
    Operator(Operator),
    /// Leaf node of a process tree
    Leaf(LeafLabel),
}

impl Node {
    ///
    /// Creates a new [`Node::Operator`] with the given [`OperatorType`] and no children
    ///
    pub fn new_operator(op_type: OperatorType) -> Self {
        Node::Operator(Operator::new(op_type))
    }

    ///
    /// Creates a new [`Node::Operator`] with the given children
    ///
    pub fn operator(op_type: OperatorType, children: Vec<Node>) -> Self {
        Node::Operator(Operator {
            operator_type: op_type,
            children,
        })
    }

    ///
    /// Creates a new non-silent (`Some(label)`) or silent (`None`) leaf [`Node`]
    ///
    pub fn new_leaf(leaf_label: Option<String>) -> Self {
        match leaf_label {
            Some(label) => Node::Leaf(LeafLabel::Activity(label)),
            None => Node::Leaf(LeafLabel::Tau),
        }
    }

    /// Creates a non-silent leaf
    pub fn activity<S: Into<String>>(label: S) -> Self {
        Node::Leaf(LeafLabel::Activity(label.into()))
    }

    /// Creates a silent leaf
    pub fn tau() -> Self {
        Node::Leaf(LeafLabel::Tau)
    }

    ///
    /// Adds a node as child if the node is an operator node
    ///
    /// Returns [`ProcessTreeError::ChildOfLeaf`] for leaves.
    ///
    pub fn add_child(&mut self, child: Node) -> Result<(), ProcessTreeError> {
        match self {
            Node::Operator(op) => {
                op.children.push(child);
                Ok(())
            }
            Node::Leaf(label) => Err(ProcessTreeError::ChildOfLeaf(label.clone())),
        }
    }

    /// Children of the node (empty for leaves)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Operator(op) => &op.children,
            Node::Leaf(_) => &[],
        }
    }

    /// Returns `true` for leaf nodes
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    ///
    /// Returns `true` if a loop operator has at least two children or if all other operators
    /// have at least one child.
    ///
    pub fn check_children_valid(&self) -> bool {
        match self {
            Node::Operator(op) => match op.operator_type {
                OperatorType::Loop => op.children.len() >= 2,
                _ => !op.children.is_empty(),
            },
            Node::Leaf(_) => true,
        }
    }

    /// Number of nodes in the subtree rooted at this node
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    /// Number of levels of the subtree rooted at this node (`1` for a leaf)
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Node::depth).max().unwrap_or(0)
    }

    ///
    /// All nodes of the subtree in pre-order (parents before children, children from
    /// left to right)
    ///
    pub fn preorder(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(node.children().iter().rev());
        }
        result
    }

    /// Canonical tuple form of the subtree
    pub fn to_tuple(&self) -> TreeTuple {
        match self {
            Node::Leaf(LeafLabel::Activity(label)) => TreeTuple::Label(label.clone()),
            Node::Leaf(LeafLabel::Tau) => TreeTuple::Label(TAU_LABEL.to_string()),
            Node::Operator(op) => TreeTuple::Tuple(
                std::iter::once(TreeTuple::Label(op.operator_type.token().to_string()))
                    .chain(op.children.iter().map(Node::to_tuple))
                    .collect(),
            ),
        }
    }

    ///
    /// Parses the canonical tuple form
    ///
    /// The label [`TAU_LABEL`] always denotes a silent leaf.
    ///
    pub fn from_tuple(tuple: &TreeTuple) -> Result<Self, ProcessTreeError> {
        match tuple {
            TreeTuple::Label(label) if label == TAU_LABEL => Ok(Node::tau()),
            TreeTuple::Label(label) => Ok(Node::activity(label.as_str())),
            TreeTuple::Tuple(items) => {
                let (kind, children) = match items.split_first() {
                    Some((TreeTuple::Label(kind), children)) => (kind, children),
                    _ => return Err(ProcessTreeError::MissingOperatorKind),
                };
                let op_type = OperatorType::from_token(kind)
                    .ok_or_else(|| ProcessTreeError::UnknownOperator(kind.clone()))?;
                let children = children
                    .iter()
                    .map(Node::from_tuple)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::operator(op_type, children))
            }
        }
    }
}

impl TryFrom<TreeTuple> for Node {
    type Error = ProcessTreeError;

    fn try_from(value: TreeTuple) -> Result<Self, Self::Error> {
        Node::from_tuple(&value)
    }
}

impl From<Node> for TreeTuple {
    fn from(value: Node) -> Self {
        value.to_tuple()
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(label) => write!(f, "{label}"),
            Node::Operator(op) => {
                write!(f, "{}( ", op.operator_type.symbol())?;
                for (i, child) in op.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, " )")
            }
        }
    }
}

///
/// Process tree struct that contains [`Node`] as root
///
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessTree {
    /// The root of the process tree
    pub root: Node,
}

impl ProcessTree {
    ///
    /// Initializes the process tree with the given node as root
    ///
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    ///
    /// Returns `true` if all nodes have the right number of children
    ///
    pub fn is_valid(&self) -> bool {
        self.root
            .preorder()
            .into_iter()
            .all(Node::check_children_valid)
    }

    ///
    /// Returns all leaves, level by level from the root
    ///
    pub fn find_all_leaves(&self) -> Vec<&LeafLabel> {
        let mut result: Vec<&LeafLabel> = Vec::new();

        let mut curr_operators: Vec<&Operator> = Vec::new();
        match &self.root {
            Node::Operator(op) => curr_operators.push(op),
            Node::Leaf(leaf) => result.push(leaf),
        };

        let mut next_operators = Vec::new();

        while !curr_operators.is_empty() {
            curr_operators.iter().for_each(|op| {
                op.children.iter().for_each(|child| match child {
                    Node::Operator(op) => next_operators.push(op),
                    Node::Leaf(leaf) => result.push(leaf),
                })
            });

            curr_operators = next_operators;
            next_operators = Vec::new();
        }

        result
    }

    /// All visible activity labels (silent leaves excluded)
    pub fn activities(&self) -> HashSet<Activity> {
        self.find_all_leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                LeafLabel::Activity(label) => Some(label.clone()),
                LeafLabel::Tau => None,
            })
            .collect()
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Number of levels (`1` for a single leaf)
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Canonical tuple form of the tree
    pub fn to_tuple(&self) -> TreeTuple {
        self.root.to_tuple()
    }

    /// Parses the canonical tuple form
    pub fn from_tuple(tuple: &TreeTuple) -> Result<Self, ProcessTreeError> {
        Node::from_tuple(tuple).map(Self::new)
    }

    /// Serialize to JSON string (tuple form)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_tuple())
    }

    /// Deserialize from JSON string (tuple form)
    pub fn from_json(json: &str) -> Result<Self, ProcessTreeError> {
        let tuple: TreeTuple = serde_json::from_str(json)?;
        Self::from_tuple(&tuple)
    }
}

impl From<Node> for ProcessTree {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

impl Display for ProcessTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
