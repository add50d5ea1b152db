use super::Customer;
use crate::analytics::RunStats;
use crate::error::SimError;
use crate::timeline::{CustomerId, SimTime};
use serde::{Deserialize, Serialize};

pub type ServerId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    Idle,
    Busy,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub id: ServerId,
    customer: Option<Customer>,
    served: u64,
}

impl Server {
    pub fn new(id: ServerId) -> Self {
        Self {
            id,
            customer: None,
            served: 0,
        }
    }

    pub fn status(&self) -> ServerStatus {
        if self.customer.is_some() {
            ServerStatus::Busy
        } else {
            ServerStatus::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.customer.is_some()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Customers this server has started serving.
    pub fn served(&self) -> u64 {
        self.served
    }
}

/// Fixed set of servers, scanned in index order.
#[derive(Debug, Clone)]
pub struct ServerPool {
    servers: Vec<Server>,
}

impl ServerPool {
    pub fn new(size: usize) -> Self {
        Self {
            servers: (0..size).map(Server::new).collect(),
        }
    }

    pub fn get(&self, id: ServerId) -> Option<&Server> {
        self.servers.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Server> {
        self.servers.iter()
    }

    pub fn busy_count(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    /// First idle server in pool order.
    pub fn find_idle(&self) -> Option<ServerId> {
        self.servers.iter().position(|s| !s.is_busy())
    }

    pub fn find_serving(&self, customer: CustomerId) -> Option<ServerId> {
        self.servers
            .iter()
            .position(|s| s.customer.as_ref().is_some_and(|c| c.id == customer))
    }

    /// Starts service and returns the completion time the caller must schedule.
    pub fn assign(
        &mut self,
        id: ServerId,
        mut customer: Customer,
        now: SimTime,
    ) -> Result<SimTime, SimError> {
        let server = self
            .servers
            .get_mut(id)
            .ok_or(SimError::UnknownServer(id))?;
        if server.is_busy() {
            return Err(SimError::ServerBusy(id));
        }
        customer.service_start = now;
        customer.service_complete = now + customer.service_time;
        let complete = customer.service_complete;
        server.customer = Some(customer);
        server.served += 1;
        Ok(complete)
    }

    /// Ends service, recording the customer's system delay, and leaves the server idle.
    pub fn release(
        &mut self,
        id: ServerId,
        now: SimTime,
        stats: &mut RunStats,
    ) -> Result<Customer, SimError> {
        let server = self
            .servers
            .get_mut(id)
            .ok_or(SimError::UnknownServer(id))?;
        let mut customer = server.customer.take().ok_or(SimError::ServerIdle(id))?;
        customer.system_delay = now - customer.arrival_time;
        stats.system_delay.record(customer.system_delay);
        Ok(customer)
    }
}
