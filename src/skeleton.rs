use std::collections::HashMap;

use crate::error::{EvalError, Result};
use crate::types::Pose;

pub const ASPSET_17J: &str = "aspset_17j";
pub const H36M_17J: &str = "h36m_17j";

/// (joint name, parent index) in joint order.
const ASPSET_17J_TABLE: [(&str, Option<usize>); 17] = [
    ("right_ankle", Some(1)),
    ("right_knee", Some(2)),
    ("right_hip", Some(16)),
    ("right_wrist", Some(4)),
    ("right_elbow", Some(5)),
    ("right_shoulder", Some(14)),
    ("left_ankle", Some(7)),
    ("left_knee", Some(8)),
    ("left_hip", Some(16)),
    ("left_wrist", Some(10)),
    ("left_elbow", Some(11)),
    ("left_shoulder", Some(14)),
    ("head_top", Some(13)),
    ("head", Some(14)),
    ("neck", Some(15)),
    ("spine", Some(16)),
    ("pelvis", None),
];

const H36M_17J_TABLE: [(&str, Option<usize>); 17] = [
    ("pelvis", None),
    ("right_hip", Some(0)),
    ("right_knee", Some(1)),
    ("right_ankle", Some(2)),
    ("left_hip", Some(0)),
    ("left_knee", Some(4)),
    ("left_ankle", Some(5)),
    ("spine", Some(0)),
    ("neck", Some(7)),
    ("head", Some(8)),
    ("head_top", Some(9)),
    ("left_shoulder", Some(8)),
    ("left_elbow", Some(11)),
    ("left_wrist", Some(12)),
    ("right_shoulder", Some(8)),
    ("right_elbow", Some(14)),
    ("right_wrist", Some(15)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointGroup {
    Left,
    Right,
    Centre,
}

impl JointGroup {
    fn from_joint_name(name: &str) -> JointGroup {
        if name.starts_with("left_") {
            JointGroup::Left
        } else if name.starts_with("right_") {
            JointGroup::Right
        } else {
            JointGroup::Centre
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointInfo {
    pub name: String,
    pub parent: Option<usize>,
    pub group: JointGroup,
}

/// Joint layout: names, kinematic tree and root.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    name: String,
    joints: Vec<JointInfo>,
    root_joint_id: usize,
}

impl Skeleton {
    /// Builds a skeleton from `(joint name, parent index)` pairs.
    ///
    /// Exactly one joint must be parentless and every parent chain must end there.
    pub fn try_new(name: &str, table: &[(&str, Option<usize>)]) -> Result<Skeleton> {
        let roots = table.iter().filter(|(_, p)| p.is_none()).count();
        if roots != 1 {
            return Err(EvalError::Configuration(format!(
                "skeleton {} must have exactly one root joint, found {}",
                name, roots
            )));
        }
        if let Some((joint, _)) = table
            .iter()
            .find(|(_, p)| p.is_some_and(|p| p >= table.len()))
        {
            return Err(EvalError::Configuration(format!(
                "skeleton {}: parent of {} is out of range",
                name, joint
            )));
        }
        let skeleton = Self::from_table(name, table);
        for idx in 0..skeleton.num_joints() {
            // A chain longer than the joint count must contain a cycle.
            if skeleton.ancestors(idx).len() > skeleton.num_joints() {
                return Err(EvalError::Configuration(format!(
                    "skeleton {}: joint {} is part of a cycle",
                    name, skeleton.joints[idx].name
                )));
            }
        }
        Ok(skeleton)
    }

    fn from_table(name: &str, table: &[(&str, Option<usize>)]) -> Skeleton {
        let joints = table
            .iter()
            .map(|(joint, parent)| JointInfo {
                name: joint.to_string(),
                parent: *parent,
                group: JointGroup::from_joint_name(joint),
            })
            .collect();
        let root_joint_id = table.iter().position(|(_, p)| p.is_none()).unwrap_or(0);
        Skeleton {
            name: name.to_string(),
            joints,
            root_joint_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[JointInfo] {
        &self.joints
    }

    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn joint_index(&self, joint_name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == joint_name)
    }

    pub fn root_joint_id(&self) -> usize {
        self.root_joint_id
    }

    /// `idx` followed by its parent chain up to the root.
    ///
    /// Stops after one step past the joint count so a malformed tree cannot loop forever.
    fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.joints[current].parent {
            chain.push(parent);
            if chain.len() > self.joints.len() {
                break;
            }
            current = parent;
        }
        chain
    }

    fn require_joint(&self, joint_name: &str) -> Result<usize> {
        self.joint_index(joint_name).ok_or_else(|| {
            EvalError::Configuration(format!("skeleton {} has no joint {}", self.name, joint_name))
        })
    }

    /// Sum of bone lengths on the tree path between two joints.
    pub fn chain_length(&self, pose: &Pose, from: &str, to: &str) -> Result<f64> {
        let from_chain = self.ancestors(self.require_joint(from)?);
        let to_chain = self.ancestors(self.require_joint(to)?);
        let lca = from_chain
            .iter()
            .copied()
            .find(|j| to_chain.contains(j))
            .ok_or_else(|| {
                EvalError::Configuration(format!("joints {} and {} are not connected", from, to))
            })?;
        let joints = pose.to_f64();
        let segment_sum = |chain: &[usize]| -> f64 {
            let end = chain.iter().position(|&j| j == lca).unwrap_or(0);
            chain[..=end]
                .windows(2)
                .map(|w| (joints[w[0]] - joints[w[1]]).norm())
                .sum()
        };
        Ok(segment_sum(&from_chain) + segment_sum(&to_chain))
    }

    /// Mean of the left and right knee-to-neck chain lengths.
    pub fn knee_neck_height(&self, pose: &Pose) -> Result<f64> {
        self.check_shape(pose)?;
        let left = self.chain_length(pose, "left_knee", "neck")?;
        let right = self.chain_length(pose, "right_knee", "neck")?;
        Ok((left + right) / 2.0)
    }

    fn check_shape(&self, pose: &Pose) -> Result<()> {
        if pose.num_joints() != self.num_joints() {
            return Err(EvalError::ShapeMismatch(format!(
                "pose has {} joints but skeleton {} has {}",
                pose.num_joints(),
                self.name,
                self.num_joints()
            )));
        }
        Ok(())
    }

    /// Rejects poses that cannot belong to this skeleton: wrong joint count,
    /// non-finite coordinates, or every joint collapsed onto one point.
    pub fn check_plausible(&self, pose: &Pose) -> Result<()> {
        if pose.num_joints() != self.num_joints() {
            return Err(EvalError::Plausibility(format!(
                "expected {} joints for {}, got {}",
                self.num_joints(),
                self.name,
                pose.num_joints()
            )));
        }
        if !pose.is_finite() {
            return Err(EvalError::Plausibility(
                "pose contains non-finite coordinates".to_string(),
            ));
        }
        let first = pose.joint(0);
        if pose.joints().iter().all(|j| j == first) {
            return Err(EvalError::Plausibility(
                "all joints share the same position".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn aspset_17j() -> Skeleton {
    Skeleton::from_table(ASPSET_17J, &ASPSET_17J_TABLE)
}

pub fn h36m_17j() -> Skeleton {
    Skeleton::from_table(H36M_17J, &H36M_17J_TABLE)
}

/// Maps pose arrays from one named joint layout to another.
pub trait SkeletonConverter: Sync {
    fn convert(&self, poses: &[Pose], from: &str, to: &str) -> Result<Vec<Pose>>;
}

/// Read-only lookup table of known skeletons, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct SkeletonRegistry {
    skeletons: HashMap<String, Skeleton>,
}

impl SkeletonRegistry {
    pub fn new() -> SkeletonRegistry {
        SkeletonRegistry::default()
    }

    pub fn builtin() -> SkeletonRegistry {
        let mut registry = SkeletonRegistry::new();
        registry.register(aspset_17j());
        registry.register(h36m_17j());
        registry
    }

    pub fn register(&mut self, skeleton: Skeleton) {
        self.skeletons.insert(skeleton.name().to_string(), skeleton);
    }

    pub fn get(&self, name: &str) -> Result<&Skeleton> {
        self.skeletons
            .get(name)
            .ok_or_else(|| EvalError::UnknownSkeleton(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.skeletons.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl SkeletonConverter for SkeletonRegistry {
    /// Reorders joints by name; every target joint must exist in the source layout.
    fn convert(&self, poses: &[Pose], from: &str, to: &str) -> Result<Vec<Pose>> {
        let source = self.get(from)?;
        let target = self.get(to)?;
        for pose in poses {
            source.check_shape(pose)?;
        }
        if from == to {
            return Ok(poses.to_vec());
        }
        let mapping = target
            .joints()
            .iter()
            .map(|j| {
                source.joint_index(&j.name).ok_or_else(|| {
                    EvalError::Configuration(format!(
                        "cannot convert {} to {}: missing joint {}",
                        from, to, j.name
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        log::trace!("converting {} poses from {} to {}", poses.len(), from, to);
        Ok(poses
            .iter()
            .map(|pose| Pose::new(mapping.iter().map(|&i| *pose.joint(i)).collect()))
            .collect())
    }
}
