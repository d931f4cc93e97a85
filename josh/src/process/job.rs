use nix::unistd::Pid;

use super::state::JobStatus;

/// One tracked process. The pid doubles as the process group id; every
/// launched job is made the leader of its own group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub name: String,
    pub status: JobStatus,
}

impl Job {
    pub fn new(pid: Pid, name: String, status: JobStatus) -> Self {
        Job { pid, name, status }
    }
}

/// Insertion-ordered collection of tracked jobs, addressed by positional
/// index. Indices at or beyond a removed position shift down by one, so an
/// index must never be cached across a mutation; the pid-based helpers
/// exist for traversals that mutate.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        JobRegistry { jobs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Appends at the end.
    pub fn insert(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    /// Deletes the job at `index`; subsequent indices shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        if index < self.jobs.len() {
            Some(self.jobs.remove(index))
        } else {
            None
        }
    }

    /// Lazy, restartable traversal in current order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Job)> {
        self.jobs.iter().enumerate()
    }

    /// Current position of the job owning `pid`, recomputed on each call.
    pub fn position(&self, pid: Pid) -> Option<usize> {
        self.jobs.iter().position(|job| job.pid == pid)
    }

    pub fn find_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.pid == pid)
    }

    /// Snapshot of the pids currently in background status, taken before a
    /// mutating traversal.
    pub fn background_pids(&self) -> Vec<Pid> {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Background)
            .map(|job| job.pid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(pid: i32, name: &str, status: JobStatus) -> Job {
        Job::new(Pid::from_raw(pid), name.to_string(), status)
    }

    fn registry() -> JobRegistry {
        let mut jobs = JobRegistry::new();
        jobs.insert(job(100, "sleep", JobStatus::Background));
        jobs.insert(job(200, "cat", JobStatus::Stopped));
        jobs.insert(job(300, "vi", JobStatus::Stopped));
        jobs
    }

    #[test]
    fn get_returns_job_by_position() {
        let jobs = registry();
        assert_eq!(jobs.get(0).unwrap().name, "sleep");
        assert_eq!(jobs.get(2).unwrap().name, "vi");
        assert!(jobs.get(3).is_none());
    }

    #[test]
    fn remove_shifts_later_indices_down() {
        let mut jobs = registry();
        let removed = jobs.remove(1).unwrap();
        assert_eq!(removed.name, "cat");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs.get(1).unwrap().name, "vi");
        assert!(jobs.position(Pid::from_raw(200)).is_none());
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut jobs = registry();
        assert!(jobs.remove(3).is_none());
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let jobs = registry();
        let names: Vec<&str> = jobs.iter().map(|(_, job)| job.name.as_str()).collect();
        assert_eq!(names, vec!["sleep", "cat", "vi"]);
        // restartable
        assert_eq!(jobs.iter().count(), 3);
    }

    #[test]
    fn position_is_recomputed_after_removal() {
        let mut jobs = registry();
        assert_eq!(jobs.position(Pid::from_raw(300)), Some(2));
        jobs.remove(0);
        assert_eq!(jobs.position(Pid::from_raw(300)), Some(1));
    }

    #[test]
    fn background_pids_snapshot() {
        let jobs = registry();
        assert_eq!(jobs.background_pids(), vec![Pid::from_raw(100)]);
    }
}
