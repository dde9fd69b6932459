//! GetNext-driven walks: subtree/table enumeration and full-MIB traversal.
//!
//! All walks are bounded loops of GetNext exchanges. Termination is driven
//! by the device: an error status means the table is exhausted (not a
//! failure), an OID outside the base prefix means the walk left the subtree,
//! and an OID that fails to advance means the device is stuck.

use crate::error::{Error, Result, WalkAbortReason};
use crate::oid::Oid;
use crate::transport::Transport;
use crate::varbind::VarBind;

use super::Client;

/// One row of a multi-column table walk, one varbind per requested column.
pub type TableRow = Vec<VarBind>;

impl<T: Transport> Client<T> {
    /// Walk every variable under `base`, in lexicographic order.
    ///
    /// Repeatedly asks "next after the previous OID" starting from `base`.
    /// The walk ends cleanly when the device reports an error status
    /// (end-of-table) or returns an OID outside the `base` prefix. A device
    /// that answers with a non-advancing OID would loop forever, so that
    /// aborts with [`WalkAbortReason::NonIncreasing`].
    ///
    /// ```rust,no_run
    /// # async fn example() -> snmpv1::Result<()> {
    /// # let client = snmpv1::Client::builder("192.0.2.1:161").connect().await?;
    /// use snmpv1::oid;
    ///
    /// // Everything in the system group
    /// for vb in client.walk(&oid!(1, 3, 6, 1, 2, 1, 1)).await? {
    ///     println!("{}", vb);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn walk(&self, base: &Oid) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        let mut current = base.clone();

        loop {
            let vb = match self.get_next(&current).await {
                Ok(vb) => vb,
                // An error status ends the table; it is not a failure
                Err(Error::Get { .. }) => break,
                Err(e) => return Err(e),
            };

            if !vb.oid.starts_with(base) {
                break;
            }
            if vb.oid <= current {
                return Err(Error::WalkAborted {
                    target: self.peer_addr(),
                    reason: WalkAbortReason::NonIncreasing,
                });
            }

            current = vb.oid.clone();
            results.push(vb);
        }

        tracing::debug!(
            target: "snmpv1::client",
            peer = %self.peer_addr(),
            base = %base,
            count = results.len(),
            "walk complete"
        );
        Ok(results)
    }

    /// Walk the entire MIB view starting after `start`.
    ///
    /// Unlike [`walk`](Self::walk), no prefix bounds the traversal; it runs
    /// until the device reports an error status or stops advancing (returns
    /// the OID that was just asked about), which is how devices without an
    /// explicit end marker signal exhaustion.
    pub async fn walk_all(&self, start: &Oid) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        let mut current = start.clone();

        loop {
            let vb = match self.get_next(&current).await {
                Ok(vb) => vb,
                Err(Error::Get { .. }) => break,
                Err(e) => return Err(e),
            };

            // A device that does not advance is done
            if vb.oid == current {
                break;
            }

            current = vb.oid.clone();
            results.push(vb);
        }

        Ok(results)
    }

    /// Walk several table columns in lockstep, yielding one row per index.
    ///
    /// Each iteration issues one GetNext carrying every column's current
    /// OID. The walk ends cleanly when the *first* column leaves its base
    /// prefix (or the device reports an error status); any *other* column
    /// leaving its prefix while the first still produces values means the
    /// table is ragged, which aborts with
    /// [`WalkAbortReason::IncompleteRow`].
    ///
    /// ```rust,no_run
    /// # async fn example() -> snmpv1::Result<()> {
    /// # let client = snmpv1::Client::builder("192.0.2.1:161").connect().await?;
    /// use snmpv1::oid;
    ///
    /// // ifIndex, ifDescr, ifOperStatus
    /// let rows = client
    ///     .get_table(&[
    ///         oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1),
    ///         oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2),
    ///         oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 8),
    ///     ])
    ///     .await?;
    /// for row in rows {
    ///     println!("{} {} {}", row[0].value, row[1].value, row[2].value);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_table(&self, columns: &[Oid]) -> Result<Vec<TableRow>> {
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        let mut current: Vec<Oid> = columns.to_vec();

        'rows: loop {
            let varbinds = match self.get_next_many(&current).await {
                Ok(vbs) => vbs,
                Err(Error::Get { .. }) => break,
                Err(e) => return Err(e),
            };

            let mut row: TableRow = Vec::with_capacity(columns.len());
            for (column, vb) in varbinds.into_iter().enumerate().take(columns.len()) {
                if !vb.oid.starts_with(&columns[column]) {
                    if column == 0 {
                        // first column exhausted: the table is done
                        break 'rows;
                    }
                    // a later column ran out while the first still answers
                    return Err(Error::WalkAborted {
                        target: self.peer_addr(),
                        reason: WalkAbortReason::IncompleteRow,
                    });
                }
                row.push(vb);
            }

            if row[0].oid <= current[0] {
                return Err(Error::WalkAborted {
                    target: self.peer_addr(),
                    reason: WalkAbortReason::NonIncreasing,
                });
            }

            current = row.iter().map(|vb| vb.oid.clone()).collect();
            rows.push(row);
        }

        Ok(rows)
    }
}
